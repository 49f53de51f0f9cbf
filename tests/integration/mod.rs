//! Integration tests for the work item status pipeline
//!
//! These tests drive the public library API against a real docs tree in a
//! temporary directory and check every file the pipeline touches.

pub mod archive_flow;
pub mod helpers;
pub mod status_update;
