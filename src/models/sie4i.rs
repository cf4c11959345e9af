//! The complete in-memory export
//!
//! [`Sie4iModel`] is what the parser produces, the validator checks and the
//! writer renders. Chart data (accounts, dimensions, dimension objects) is
//! kept sorted by key; journal entries keep their insertion order.

use super::account::Account;
use super::dimension::{Dimension, DimensionObject};
use super::identification::Identification;
use super::journal::JournalEntry;

/// One accounting export
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sie4iModel {
    pub identification: Identification,
    pub accounts: Vec<Account>,
    pub dimensions: Vec<Dimension>,
    pub dimension_objects: Vec<DimensionObject>,
    pub journal_entries: Vec<JournalEntry>,
}

impl Sie4iModel {
    /// Create an empty model for `identification`
    pub fn new(identification: Identification) -> Self {
        Self {
            identification,
            ..Self::default()
        }
    }

    /// Insert an account at its sorted position, replacing one with the same number
    pub fn add_account(&mut self, account: Account) -> &mut Self {
        match self
            .accounts
            .binary_search_by(|a| a.number.cmp(&account.number))
        {
            Ok(pos) => self.accounts[pos] = account,
            Err(pos) => self.accounts.insert(pos, account),
        }
        self
    }

    /// Insert a dimension at its sorted position, replacing one with the same id
    pub fn add_dimension(&mut self, dimension: Dimension) -> &mut Self {
        match self.dimensions.binary_search_by_key(&dimension.id, |d| d.id) {
            Ok(pos) => self.dimensions[pos] = dimension,
            Err(pos) => self.dimensions.insert(pos, dimension),
        }
        self
    }

    /// Insert a dimension object at its sorted position, replacing one with the same key
    pub fn add_dimension_object(&mut self, object: DimensionObject) -> &mut Self {
        match self
            .dimension_objects
            .binary_search_by(|o| o.key_cmp(&object))
        {
            Ok(pos) => self.dimension_objects[pos] = object,
            Err(pos) => self.dimension_objects.insert(pos, object),
        }
        self
    }

    /// Append a journal entry
    pub fn add_journal_entry(&mut self, entry: JournalEntry) -> &mut Self {
        self.journal_entries.push(entry);
        self
    }

    pub fn find_dimension(&self, id: u32) -> Option<&Dimension> {
        self.dimensions
            .binary_search_by_key(&id, |d| d.id)
            .ok()
            .map(|pos| &self.dimensions[pos])
    }

    /// Number of ledger lines over all journal entries
    pub fn ledger_line_count(&self) -> usize {
        self.journal_entries.iter().map(|e| e.lines.len()).sum()
    }
}
