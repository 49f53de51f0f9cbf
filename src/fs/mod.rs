pub mod archive;
pub mod docs_dir;
pub mod item_files;
pub mod links;
pub mod locking;
pub mod registry;
pub mod status_log;

pub use docs_dir::{Config, DocsLayout, CONFIG_FILE};
pub use item_files::{find_item_file, load_item, load_item_from_path, save_item, scan_items, ItemScan, ScannedItem};
pub use archive::{archive_completed, archive_completed_at, ArchiveOptions, ArchiveReport};
pub use links::{add_backlinks, check_links, Link, LinkReport, MissingBacklink};
pub use registry::{sync_registry, update_registry};
pub use status_log::{log_status_change, StatusChange};
