pub mod status;
pub mod transitions;

pub use status::{validate_transition_rules, validate_work_item_status};
pub use transitions::{update_work_item_status, update_work_item_status_at, StatusUpdate, StatusUpdateRequest};
