//! Strongly-typed key wrappers
//!
//! Account numbers appear on both `#KONTO`-style chart records and on
//! `#TRANS` ledger lines. Both go through [`AccountNumber`] so the numeric
//! check lives in one place.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A numeric account number, kept as its original digit string
///
/// Ordering is numeric: `"999"` sorts before `"1000"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Parse an account number, rejecting anything that is not all digits
    pub fn parse(s: &str) -> Result<Self, AccountNumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AccountNumberError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountNumberError::NotNumeric(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl Ord for AccountNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for AccountNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::parse(&n.to_string())
    }
}

/// Error type for account number parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountNumberError {
    Empty,
    NotNumeric(String),
}

impl fmt::Display for AccountNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Account number is empty"),
            Self::NotNumeric(s) => write!(f, "Account number is not numeric: {}", s),
        }
    }
}

impl std::error::Error for AccountNumberError {}
