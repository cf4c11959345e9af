//! Service layer for sie4i
//!
//! The conversion engine proper: the record stream parser, the model
//! validator, the writer, and the byte-level pipeline that ties them to the
//! wire encoding.

pub mod convert;
pub mod parser;
pub mod validator;
pub mod writer;

pub use convert::{parse_bytes, parse_lines, render_lines, write_bytes, write_to, WriteOptions};
pub use parser::{Parsed, Parser};
pub use validator::validate;
pub use writer::Rendered;
