//! Identification model
//!
//! The single block of `#PROGRAM`, `#GEN`, `#FNR`, `#ORGNR`, `#FNAMN` and
//! `#VALUTA` facts describing who produced an export and for which company.

use chrono::NaiveDate;

/// Identification of an export (one per model)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// Name of the program that generated the file
    pub program_name: String,

    /// Version of that program
    pub program_version: String,

    /// Generation date
    pub generated: Option<NaiveDate>,

    /// Who generated the file; falls back to the program name when absent
    pub signer: Option<String>,

    /// Internal company id of the exporting program (`#FNR`)
    pub client_id: Option<String>,

    /// Organization number (`#ORGNR`)
    pub organization_id: Option<String>,

    /// Sequence number for several businesses under one organization number
    pub organization_sequence: u32,

    /// Full company name, required for a valid model
    pub company_name: Option<String>,

    /// Accounting currency code
    pub currency: Option<String>,
}

impl Default for Identification {
    fn default() -> Self {
        Self {
            program_name: String::new(),
            program_version: String::new(),
            generated: None,
            signer: None,
            client_id: None,
            organization_id: None,
            organization_sequence: 1,
            company_name: None,
            currency: None,
        }
    }
}

impl Identification {
    /// Create an identification for a program run on `generated`
    pub fn new(
        program_name: impl Into<String>,
        program_version: impl Into<String>,
        generated: NaiveDate,
    ) -> Self {
        Self {
            program_name: program_name.into(),
            program_version: program_version.into(),
            generated: Some(generated),
            ..Self::default()
        }
    }

    /// Set the company name
    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    /// Set the organization number and sequence
    pub fn with_organization(mut self, organization_id: impl Into<String>, sequence: u32) -> Self {
        self.organization_id = Some(organization_id.into());
        self.organization_sequence = sequence;
        self
    }

    /// The signer, or the program name when none was given
    pub fn effective_signer(&self) -> &str {
        self.signer.as_deref().unwrap_or(&self.program_name)
    }
}
