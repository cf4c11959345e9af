//! Wire format of the record stream
//!
//! Everything that knows about bytes, labels and field syntax lives here:
//! codepage 437 transcoding, the label table, the line grammar and the
//! checksum engine. Nothing in this module knows about the model.

pub mod checksum;
pub mod encoding;
pub mod grammar;
pub mod label;

pub use checksum::ChecksumEngine;
pub use grammar::{Field, Line};
pub use label::{Group, Label};
