//! Journal entry and ledger line models
//!
//! A journal entry (`#VER`) is one voucher header; its ledger lines
//! (`#TRANS`) are the postings inside the braces that follow it.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ids::AccountNumber;

/// A (dimension id, object id) reference on a ledger line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub dimension_id: u32,
    /// Opaque object id; empty means missing
    pub object_id: String,
}

impl ObjectRef {
    pub fn new(dimension_id: u32, object_id: impl Into<String>) -> Self {
        Self {
            dimension_id,
            object_id: object_id.into(),
        }
    }
}

/// One posting within a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerLine {
    pub account: Option<AccountNumber>,

    /// Object references, in encountered order
    pub objects: Vec<ObjectRef>,

    pub amount: Option<Decimal>,

    /// Transaction date; the entry date applies when absent
    pub date: Option<NaiveDate>,

    pub text: Option<String>,

    pub quantity: Option<Decimal>,

    pub signer: Option<String>,
}

impl LedgerLine {
    /// Create a posting of `amount` on `account`
    pub fn new(account: AccountNumber, amount: Decimal) -> Self {
        Self {
            account: Some(account),
            amount: Some(amount),
            ..Self::default()
        }
    }

    /// Tag the line with a dimension object
    pub fn with_object(mut self, dimension_id: u32, object_id: impl Into<String>) -> Self {
        self.objects.push(ObjectRef::new(dimension_id, object_id));
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// The transaction date, or `entry_date` when none was given
    pub fn date_or(&self, entry_date: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(entry_date)
    }
}

/// A voucher with its postings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalEntry {
    /// Voucher series (e.g. "A")
    pub series: Option<String>,

    /// Voucher number within the series
    pub sequence: Option<u64>,

    /// Entry date, required for a valid model
    pub date: Option<NaiveDate>,

    pub text: Option<String>,

    /// Registration date; equal to the entry date when absent
    pub registration_date: Option<NaiveDate>,

    /// Who registered the entry; the identification signer applies when absent
    pub signer: Option<String>,

    /// Postings, in order
    pub lines: Vec<LedgerLine>,
}

impl JournalEntry {
    /// Create an empty entry dated `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn with_series(mut self, series: impl Into<String>, sequence: u64) -> Self {
        self.series = Some(series.into());
        self.sequence = Some(sequence);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_signer(mut self, signer: impl Into<String>) -> Self {
        self.signer = Some(signer.into());
        self
    }

    /// Append a posting
    pub fn push_line(&mut self, line: LedgerLine) {
        self.lines.push(line);
    }

    /// Builder form of [`JournalEntry::push_line`]
    pub fn with_line(mut self, line: LedgerLine) -> Self {
        self.push_line(line);
        self
    }

    /// The registration date, or the entry date when none was given
    pub fn registration_date_or_entry(&self) -> Option<NaiveDate> {
        self.registration_date.or(self.date)
    }

    /// The signer, or `default` when none was given
    pub fn signer_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.signer.as_deref().unwrap_or(default)
    }

    /// Sum of all line amounts; zero for a balanced entry
    pub fn balance(&self) -> Decimal {
        self.lines.iter().filter_map(|l| l.amount).sum()
    }
}
