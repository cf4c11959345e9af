//! Ledger document boundary
//!
//! The richer ledger document format is owned by a separate library. This
//! crate only knows two calls across that boundary: build a model from a
//! document, and render a document from a model. Both sides are validated
//! here so a collaborator never sees an invalid model.

use crate::error::Sie4iResult;
use crate::models::Sie4iModel;
use crate::services::validator;

/// A document tree that can be converted to and from a [`Sie4iModel`]
///
/// Implementations resolve the model's implied defaults through
/// [`LedgerLine::date_or`](crate::models::LedgerLine::date_or),
/// [`JournalEntry::registration_date_or_entry`](crate::models::JournalEntry::registration_date_or_entry),
/// [`JournalEntry::signer_or`](crate::models::JournalEntry::signer_or) and
/// [`Identification::effective_signer`](crate::models::Identification::effective_signer).
pub trait LedgerDocument: Sized {
    /// Render a document from a validated model
    fn from_model(model: &Sie4iModel) -> Sie4iResult<Self>;

    /// Build a model from this document
    fn to_model(&self) -> Sie4iResult<Sie4iModel>;
}

/// Build a model from `document` and validate it
pub fn load_document<D: LedgerDocument>(document: &D) -> Sie4iResult<Sie4iModel> {
    let model = document.to_model()?;
    validator::validate(&model)?;
    Ok(model)
}

/// Validate `model` and render it as a document
pub fn render_document<D: LedgerDocument>(model: &Sie4iModel) -> Sie4iResult<D> {
    validator::validate(model)?;
    D::from_model(model)
}
