pub mod work_item;

pub use work_item::{
    Level, Transition, TransitionError, WorkItem, WorkItemStatus, WorkItemType, TRANSITIONS,
};
