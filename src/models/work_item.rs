mod transitions;
mod types;


pub use transitions::{Transition, TransitionError, TRANSITIONS};
pub use types::{Level, WorkItem, WorkItemStatus, WorkItemType};
