//! Configuration module for sie4i
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Persisted writer defaults

pub mod paths;
pub mod settings;

pub use paths::Sie4iPaths;
pub use settings::{LineEnding, Settings};
