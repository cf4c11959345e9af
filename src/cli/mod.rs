//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod file;

pub use file::{format_summary, handle_file_command, FileCommands};
