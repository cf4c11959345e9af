//! Error types for sie4i
//!
//! Two terminal error kinds come out of a conversion: [`ParseError`] for
//! grammar and structure violations in the record stream, and
//! [`ValidationError`] for completeness violations in a model. Both carry a
//! stable numeric code. [`Sie4iError`] wraps them together with the I/O,
//! JSON and configuration failures of the surrounding pipeline.

use thiserror::Error;

/// Grammar or structural violation found while reading a record stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error {code}: {kind} (line: {line:?})", code = .kind.code())]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// The offending raw line, after transcoding
    pub line: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: impl Into<String>) -> Self {
        Self {
            kind,
            line: line.into(),
        }
    }

    /// Stable numeric code of this error
    pub fn code(&self) -> u16 {
        self.kind.code()
    }
}

/// The distinct causes of a [`ParseError`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("input contains no records")]
    EmptyInput,

    #[error("content found before the #FLAGGA start marker")]
    ContentBeforeStart,

    #[error("unknown label {0}")]
    UnknownLabel(String),

    #[error("label {label} belongs to an earlier group than the current one ({current})")]
    GroupRegression { label: String, current: u8 },

    #[error("{label} is missing field {position}")]
    MissingField { label: String, position: usize },

    #[error("invalid date '{value}' in {label}")]
    InvalidDate { label: String, value: String },

    #[error("invalid number '{value}' in {label}")]
    InvalidNumber { label: String, value: String },

    #[error("invalid account type '{0}'")]
    InvalidAccountType(String),

    #[error("unsupported SIE type '{0}', expected 4")]
    UnsupportedSieType(String),

    #[error("{entity} {key} is missing its {field}")]
    IncompleteRecord {
        entity: &'static str,
        key: String,
        field: &'static str,
    },

    #[error("transaction record outside of a #VER entry")]
    TransactionOutsideEntry,

    #[error("object list is not terminated by '}}'")]
    UnterminatedObjectList,

    #[error("object list has dimension '{0}' without an object id")]
    UnpairedObjectReference(String),
}

impl ParseErrorKind {
    pub fn code(&self) -> u16 {
        match self {
            Self::EmptyInput => 1101,
            Self::ContentBeforeStart => 1102,
            Self::UnknownLabel(_) => 1103,
            Self::GroupRegression { .. } => 1104,
            Self::MissingField { .. } => 1105,
            Self::InvalidDate { .. } => 1106,
            Self::InvalidNumber { .. } => 1107,
            Self::InvalidAccountType(_) => 1108,
            Self::UnsupportedSieType(_) => 1109,
            Self::IncompleteRecord { .. } => 1110,
            Self::TransactionOutsideEntry => 1111,
            Self::UnterminatedObjectList => 1112,
            Self::UnpairedObjectReference(_) => 1113,
        }
    }
}

/// Completeness violation found in a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation error {code}: {kind} ({entity} {key})", code = .kind.code())]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Entity type the violation was found in (e.g. "Account")
    pub entity: &'static str,
    /// Identity of the offending entity instance
    pub key: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, entity: &'static str, key: impl Into<String>) -> Self {
        Self {
            kind,
            entity,
            key: key.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }
}

/// The distinct causes of a [`ValidationError`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("company name is missing")]
    MissingCompanyName,

    #[error("account is missing its {0}")]
    IncompleteAccount(&'static str),

    #[error("dimension is missing its {0}")]
    IncompleteDimension(&'static str),

    #[error("dimension object is missing its {0}")]
    IncompleteDimensionObject(&'static str),

    #[error("dimension name '{asserted}' does not match '{declared}'")]
    DimensionNameMismatch { asserted: String, declared: String },

    #[error("no ledger entries")]
    NoJournalEntries,

    #[error("journal entry has no entry date")]
    MissingEntryDate,

    #[error("journal entry has no ledger lines")]
    EmptyJournalEntry,

    #[error("ledger line is missing its {0}")]
    IncompleteLedgerLine(&'static str),

    /// Line breaks, tabs and other control characters cannot be written
    #[error("{0} contains a control character")]
    ControlCharacter(&'static str),
}

impl ValidationErrorKind {
    pub fn code(&self) -> u16 {
        match self {
            Self::MissingCompanyName => 2101,
            Self::IncompleteAccount(_) => 2201,
            Self::IncompleteDimension(_) => 2301,
            Self::IncompleteDimensionObject(_) => 2401,
            Self::DimensionNameMismatch { .. } => 2402,
            Self::NoJournalEntries => 2501,
            Self::MissingEntryDate => 2502,
            Self::EmptyJournalEntry => 2503,
            Self::IncompleteLedgerLine(_) => 2601,
            Self::ControlCharacter(_) => 2701,
        }
    }
}

/// The main error type for sie4i operations
#[derive(Error, Debug)]
pub enum Sie4iError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Sink or file I/O errors, passed through unchanged
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed generic container input
    #[error("Projection error: {0}")]
    Projection(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by a ledger-document collaborator
    #[error("Ledger document error: {0}")]
    Document(String),
}

impl Sie4iError {
    /// Stable numeric code for parse and validation errors
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Parse(e) => Some(e.code()),
            Self::Validation(e) => Some(e.code()),
            _ => None,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for Sie4iError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for sie4i operations
pub type Sie4iResult<T> = Result<T, Sie4iError>;
