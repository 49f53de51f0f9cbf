pub mod commands;
pub mod fs;
pub mod graph;
pub mod models;
pub mod parser;
pub mod utils;
pub mod validation;
pub mod verify;
