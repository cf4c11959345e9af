//! Record labels and their groups
//!
//! Records in a stream appear in four ordered groups. The label table is a
//! constant; the lookup map from wire tag to [`Label`] is built once.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Parser position in the record stream
///
/// Variants are ordered; a stream may only move forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    NotStarted = 0,
    Started = 1,
    Identification = 2,
    ChartData = 3,
    LedgerData = 4,
}

impl Group {
    pub fn number(self) -> u8 {
        self as u8
    }
}

/// Every label the record stream knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Flagga,
    Program,
    Format,
    Gen,
    Sietyp,
    Prosa,
    Ftyp,
    Fnr,
    Orgnr,
    Adress,
    Fnamn,
    Rar,
    Taxar,
    Kptyp,
    Valuta,
    Konto,
    Ktyp,
    Enhet,
    Sru,
    Dim,
    Underdim,
    Objekt,
    Ver,
    Trans,
    Rtrans,
    Btrans,
    Ksumma,
}

impl Label {
    pub const ALL: [Label; 27] = [
        Label::Flagga,
        Label::Program,
        Label::Format,
        Label::Gen,
        Label::Sietyp,
        Label::Prosa,
        Label::Ftyp,
        Label::Fnr,
        Label::Orgnr,
        Label::Adress,
        Label::Fnamn,
        Label::Rar,
        Label::Taxar,
        Label::Kptyp,
        Label::Valuta,
        Label::Konto,
        Label::Ktyp,
        Label::Enhet,
        Label::Sru,
        Label::Dim,
        Label::Underdim,
        Label::Objekt,
        Label::Ver,
        Label::Trans,
        Label::Rtrans,
        Label::Btrans,
        Label::Ksumma,
    ];

    /// Wire form, including the leading `#`
    pub fn tag(self) -> &'static str {
        match self {
            Self::Flagga => "#FLAGGA",
            Self::Program => "#PROGRAM",
            Self::Format => "#FORMAT",
            Self::Gen => "#GEN",
            Self::Sietyp => "#SIETYP",
            Self::Prosa => "#PROSA",
            Self::Ftyp => "#FTYP",
            Self::Fnr => "#FNR",
            Self::Orgnr => "#ORGNR",
            Self::Adress => "#ADRESS",
            Self::Fnamn => "#FNAMN",
            Self::Rar => "#RAR",
            Self::Taxar => "#TAXAR",
            Self::Kptyp => "#KPTYP",
            Self::Valuta => "#VALUTA",
            Self::Konto => "#KONTO",
            Self::Ktyp => "#KTYP",
            Self::Enhet => "#ENHET",
            Self::Sru => "#SRU",
            Self::Dim => "#DIM",
            Self::Underdim => "#UNDERDIM",
            Self::Objekt => "#OBJEKT",
            Self::Ver => "#VER",
            Self::Trans => "#TRANS",
            Self::Rtrans => "#RTRANS",
            Self::Btrans => "#BTRANS",
            Self::Ksumma => "#KSUMMA",
        }
    }

    /// The group this label belongs to; `None` for `#KSUMMA`, which may appear anywhere
    pub fn group(self) -> Option<Group> {
        match self {
            Self::Flagga => Some(Group::Started),
            Self::Program
            | Self::Format
            | Self::Gen
            | Self::Sietyp
            | Self::Prosa
            | Self::Ftyp
            | Self::Fnr
            | Self::Orgnr
            | Self::Adress
            | Self::Fnamn
            | Self::Rar
            | Self::Taxar
            | Self::Kptyp
            | Self::Valuta => Some(Group::Identification),
            Self::Konto
            | Self::Ktyp
            | Self::Enhet
            | Self::Sru
            | Self::Dim
            | Self::Underdim
            | Self::Objekt => Some(Group::ChartData),
            Self::Ver | Self::Trans | Self::Rtrans | Self::Btrans => Some(Group::LedgerData),
            Self::Ksumma => None,
        }
    }

    /// Look up a label by its wire tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        LABELS_BY_TAG.get(tag.to_uppercase().as_str()).copied()
    }
}

static LABELS_BY_TAG: LazyLock<HashMap<&'static str, Label>> =
    LazyLock::new(|| Label::ALL.iter().map(|l| (l.tag(), *l)).collect());

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
