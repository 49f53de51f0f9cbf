pub mod archive;
pub mod common;
pub mod graph;
pub mod init;
pub mod links;
pub mod list;
pub mod registry;
pub mod show;
pub mod update;
