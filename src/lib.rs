//! sie4i - SIE 4I accounting export converter
//!
//! This library reads and writes the SIE 4I record stream, a line-oriented
//! codepage 437 text format for exporting journal entries, and converts it
//! to and from a canonical in-memory model.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `format`: Wire format (transcoding, labels, line grammar, checksum)
//! - `models`: The canonical model
//! - `services`: Parser, validator, writer and the byte pipeline
//! - `document`: Boundary to the richer ledger document format
//! - `projection`: Flat key/array and JSON views of the model
//!
//! # Example
//!
//! ```rust,ignore
//! use sie4i::{parse_bytes, write_bytes, WriteOptions};
//!
//! let parsed = parse_bytes(&std::fs::read("export.se")?)?;
//! let options = WriteOptions::default().with_checksum(parsed.checksum_mode);
//! let bytes = write_bytes(&parsed.model, &options)?;
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod models;
pub mod projection;
pub mod services;

pub use document::{load_document, render_document, LedgerDocument};
pub use error::{ParseError, ParseErrorKind, Sie4iError, Sie4iResult, ValidationError, ValidationErrorKind};
pub use models::Sie4iModel;
pub use services::{parse_bytes, parse_lines, write_bytes, write_to, Parsed, WriteOptions};
