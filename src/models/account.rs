//! Account model
//!
//! Chart-of-accounts entries (`#KONTO`, `#KTYP`, `#ENHET`).

use std::fmt;

use super::ids::AccountNumber;

/// Type of account, written as a single letter on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// Tillgång (`T`)
    Asset,
    /// Skuld (`S`)
    Liability,
    /// Kostnad (`K`)
    Cost,
    /// Intäkt (`I`)
    Income,
}

impl AccountType {
    /// The wire letter for this type
    pub fn code(&self) -> &'static str {
        match self {
            Self::Asset => "T",
            Self::Liability => "S",
            Self::Cost => "K",
            Self::Income => "I",
        }
    }

    /// Parse account type from its wire letter
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "T" => Some(Self::Asset),
            "S" => Some(Self::Liability),
            "K" => Some(Self::Cost),
            "I" => Some(Self::Income),
            _ => None,
        }
    }

    /// Returns true for balance sheet types
    pub fn is_balance(&self) -> bool {
        matches!(self, Self::Asset | Self::Liability)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "Asset"),
            Self::Liability => write!(f, "Liability"),
            Self::Cost => write!(f, "Cost"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A chart-of-accounts entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account number, the unique key
    pub number: AccountNumber,

    /// Account name; empty means missing
    pub name: String,

    /// Type of account
    pub account_type: Option<AccountType>,

    /// Unit used for quantity reporting (e.g. "st")
    pub unit: Option<String>,
}

impl Account {
    /// Create a complete account
    pub fn new(number: AccountNumber, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            number,
            name: name.into(),
            account_type: Some(account_type),
            unit: None,
        }
    }

    /// Set the quantity unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.name)
    }
}
