pub mod markdown;
pub mod work_item;

pub use markdown::{extract_links, split_at_headings, MarkdownLink, Section, SectionedDocument};
pub use work_item::{parse_work_item, serialize_work_item};
