//! Core data models for sie4i
//!
//! This module contains the canonical in-memory form of one accounting
//! export: identification, chart of accounts, dimensions and objects,
//! journal entries and their ledger lines.

pub mod account;
pub mod dimension;
pub mod identification;
pub mod ids;
pub mod journal;
pub mod sie4i;

pub use account::{Account, AccountType};
pub use dimension::{Dimension, DimensionObject};
pub use identification::Identification;
pub use ids::{AccountNumber, AccountNumberError};
pub use journal::{JournalEntry, LedgerLine, ObjectRef};
pub use sie4i::Sie4iModel;
