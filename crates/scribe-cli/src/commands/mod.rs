//! CLI commands

pub mod config;
pub mod edit;
pub mod recent;
pub mod snapshots;

pub use edit::{EditArgs, execute as edit_execute};
