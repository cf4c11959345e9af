//! Model validation
//!
//! Checks the structural invariants a model must satisfy before it is
//! written or handed to a ledger document. Checks run in a fixed order and
//! stop at the first failure. The model is never modified.
//!
//! Text that the writer emits must not contain control characters: a line
//! break would split the record and a tab is read back as a space.

use crate::error::{ValidationError, ValidationErrorKind};
use crate::models::{Account, Dimension, DimensionObject, JournalEntry, LedgerLine, Sie4iModel};

/// Validate `model`, returning the first violation found
pub fn validate(model: &Sie4iModel) -> Result<(), ValidationError> {
    check_identification(model)?;
    model.accounts.iter().try_for_each(check_account)?;
    model.dimensions.iter().try_for_each(check_dimension)?;
    model
        .dimension_objects
        .iter()
        .try_for_each(|object| check_dimension_object(model, object))?;

    if model.journal_entries.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::NoJournalEntries,
            "Sie4iModel",
            "",
        ));
    }
    for (index, entry) in model.journal_entries.iter().enumerate() {
        check_entry(index, entry)?;
    }
    for (index, entry) in model.journal_entries.iter().enumerate() {
        for (line_index, line) in entry.lines.iter().enumerate() {
            check_line(index, entry, line_index, line)?;
        }
    }
    Ok(())
}

/// Fail on the first text field holding a control character
fn check_text<'a>(
    entity: &'static str,
    key: impl FnOnce() -> String,
    fields: impl IntoIterator<Item = (&'static str, Option<&'a str>)>,
) -> Result<(), ValidationError> {
    let bad = fields
        .into_iter()
        .find(|(_, value)| value.is_some_and(|v| v.chars().any(char::is_control)));
    match bad {
        Some((field, _)) => Err(ValidationError::new(
            ValidationErrorKind::ControlCharacter(field),
            entity,
            key(),
        )),
        None => Ok(()),
    }
}

fn check_identification(model: &Sie4iModel) -> Result<(), ValidationError> {
    let id = &model.identification;
    match id.company_name.as_deref() {
        Some(name) if !name.trim().is_empty() => {}
        _ => {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingCompanyName,
                "Identification",
                id.program_name.clone(),
            ))
        }
    }
    check_text(
        "Identification",
        || id.program_name.clone(),
        [
            ("program name", Some(id.program_name.as_str())),
            ("program version", Some(id.program_version.as_str())),
            ("signer", id.signer.as_deref()),
            ("client id", id.client_id.as_deref()),
            ("organization id", id.organization_id.as_deref()),
            ("company name", id.company_name.as_deref()),
            ("currency", id.currency.as_deref()),
        ],
    )
}

fn check_account(account: &Account) -> Result<(), ValidationError> {
    let missing = |field: &'static str| {
        ValidationError::new(
            ValidationErrorKind::IncompleteAccount(field),
            "Account",
            account.number.to_string(),
        )
    };
    if account.name.trim().is_empty() {
        return Err(missing("name"));
    }
    if account.account_type.is_none() {
        return Err(missing("type"));
    }
    check_text(
        "Account",
        || account.number.to_string(),
        [
            ("name", Some(account.name.as_str())),
            ("unit", account.unit.as_deref()),
        ],
    )
}

fn check_dimension(dimension: &Dimension) -> Result<(), ValidationError> {
    if dimension.name.trim().is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::IncompleteDimension("name"),
            "Dimension",
            dimension.id.to_string(),
        ));
    }
    check_text(
        "Dimension",
        || dimension.id.to_string(),
        [("name", Some(dimension.name.as_str()))],
    )
}

fn check_dimension_object(
    model: &Sie4iModel,
    object: &DimensionObject,
) -> Result<(), ValidationError> {
    let key = format!("{}/{}", object.dimension_id, object.object_id);
    let missing = |field: &'static str| {
        ValidationError::new(
            ValidationErrorKind::IncompleteDimensionObject(field),
            "DimensionObject",
            key.clone(),
        )
    };
    if object.object_id.is_empty() {
        return Err(missing("object id"));
    }
    if object.name.trim().is_empty() {
        return Err(missing("name"));
    }
    check_text(
        "DimensionObject",
        || key.clone(),
        [
            ("object id", Some(object.object_id.as_str())),
            ("name", Some(object.name.as_str())),
        ],
    )?;

    if let Some(asserted) = &object.dimension_name {
        let declared = model
            .find_dimension(object.dimension_id)
            .map(|d| d.name.as_str())
            .unwrap_or_default();
        if asserted != declared {
            return Err(ValidationError::new(
                ValidationErrorKind::DimensionNameMismatch {
                    asserted: asserted.clone(),
                    declared: declared.to_string(),
                },
                "DimensionObject",
                key,
            ));
        }
    }
    Ok(())
}

/// Human-readable identity of a journal entry
fn entry_key(index: usize, entry: &JournalEntry) -> String {
    match (&entry.series, entry.sequence) {
        (Some(series), Some(sequence)) => format!("{} {}", series, sequence),
        (None, Some(sequence)) => sequence.to_string(),
        _ => format!("#{}", index + 1),
    }
}

fn check_entry(index: usize, entry: &JournalEntry) -> Result<(), ValidationError> {
    if entry.date.is_none() {
        return Err(ValidationError::new(
            ValidationErrorKind::MissingEntryDate,
            "JournalEntry",
            entry_key(index, entry),
        ));
    }
    if entry.lines.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyJournalEntry,
            "JournalEntry",
            entry_key(index, entry),
        ));
    }
    check_text(
        "JournalEntry",
        || entry_key(index, entry),
        [
            ("series", entry.series.as_deref()),
            ("text", entry.text.as_deref()),
            ("signer", entry.signer.as_deref()),
        ],
    )
}

fn check_line(
    index: usize,
    entry: &JournalEntry,
    line_index: usize,
    line: &LedgerLine,
) -> Result<(), ValidationError> {
    let missing = |field: &'static str| {
        ValidationError::new(
            ValidationErrorKind::IncompleteLedgerLine(field),
            "LedgerLine",
            format!("{} line {}", entry_key(index, entry), line_index + 1),
        )
    };
    if line.account.is_none() {
        return Err(missing("account"));
    }
    if line.amount.is_none() {
        return Err(missing("amount"));
    }
    if line.objects.iter().any(|o| o.object_id.is_empty()) {
        return Err(missing("object id"));
    }
    let objects = line
        .objects
        .iter()
        .map(|o| ("object id", Some(o.object_id.as_str())));
    check_text(
        "LedgerLine",
        || format!("{} line {}", entry_key(index, entry), line_index + 1),
        [("text", line.text.as_deref()), ("signer", line.signer.as_deref())]
            .into_iter()
            .chain(objects),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountNumber, AccountType, Identification};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
    }

    fn number(s: &str) -> AccountNumber {
        AccountNumber::parse(s).unwrap()
    }

    fn valid_model() -> Sie4iModel {
        let mut model = Sie4iModel::new(
            Identification::new("Bokföring", "1.0", date()).with_company_name("Bolaget AB"),
        );
        model
            .add_account(Account::new(number("1910"), "Kassa", AccountType::Asset))
            .add_account(Account::new(number("3000"), "Försäljning", AccountType::Income))
            .add_dimension(Dimension::new(1, "Kostnadsställe"))
            .add_dimension_object(DimensionObject::new(1, "100", "Butiken"))
            .add_journal_entry(
                JournalEntry::new(date())
                    .with_series("A", 1)
                    .with_line(LedgerLine::new(number("1910"), Decimal::new(10000, 2)))
                    .with_line(
                        LedgerLine::new(number("3000"), Decimal::new(-10000, 2))
                            .with_object(1, "100"),
                    ),
            );
        model
    }

    fn code_of(model: &Sie4iModel) -> u16 {
        validate(model).unwrap_err().code()
    }

    #[test]
    fn test_valid_model_passes() {
        assert!(validate(&valid_model()).is_ok());
    }

    #[test]
    fn test_missing_company_name() {
        let mut model = valid_model();
        model.identification.company_name = None;
        assert_eq!(code_of(&model), 2101);
    }

    #[test]
    fn test_incomplete_account() {
        let mut model = valid_model();
        model.accounts[1].account_type = None;
        let err = validate(&model).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::IncompleteAccount("type"));
        assert_eq!(err.key, "3000");
    }

    #[test]
    fn test_incomplete_dimension_and_object() {
        let mut model = valid_model();
        model.dimensions[0].name.clear();
        assert_eq!(code_of(&model), 2301);

        let mut model = valid_model();
        model.dimension_objects[0].name.clear();
        assert_eq!(code_of(&model), 2401);
    }

    #[test]
    fn test_dimension_name_assertion() {
        let mut model = valid_model();
        model.dimension_objects[0].dimension_name = Some("Kostnadsställe".into());
        assert!(validate(&model).is_ok());

        model.dimension_objects[0].dimension_name = Some("Projekt".into());
        let err = validate(&model).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::DimensionNameMismatch {
                asserted: "Projekt".into(),
                declared: "Kostnadsställe".into(),
            }
        );
    }

    #[test]
    fn test_no_journal_entries() {
        let mut model = valid_model();
        model.journal_entries.clear();
        let err = validate(&model).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NoJournalEntries);
        assert!(err.to_string().contains("no ledger entries"));
    }

    #[test]
    fn test_entry_checks() {
        let mut model = valid_model();
        model.journal_entries[0].date = None;
        let err = validate(&model).unwrap_err();
        assert_eq!(err.code(), 2502);
        assert_eq!(err.key, "A 1");

        let mut model = valid_model();
        model.journal_entries[0].lines.clear();
        assert_eq!(code_of(&model), 2503);
    }

    #[test]
    fn test_line_checks() {
        let mut model = valid_model();
        model.journal_entries[0].lines[0].amount = None;
        let err = validate(&model).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::IncompleteLedgerLine("amount"));
        assert_eq!(err.key, "A 1 line 1");

        let mut model = valid_model();
        model.journal_entries[0].lines[1].objects[0].object_id.clear();
        assert_eq!(code_of(&model), 2601);
    }

    #[test]
    fn test_control_characters_are_rejected() {
        let mut model = valid_model();
        model.journal_entries[0].text = Some("rad1\nrad2".into());
        let err = validate(&model).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::ControlCharacter("text"));
        assert_eq!(err.entity, "JournalEntry");
        assert_eq!(err.code(), 2701);

        let mut model = valid_model();
        model.identification.company_name = Some("Bolaget\tAB".into());
        assert_eq!(code_of(&model), 2701);

        let mut model = valid_model();
        model.accounts[0].name = "Kassa\r".into();
        assert_eq!(code_of(&model), 2701);

        let mut model = valid_model();
        model.journal_entries[0].lines[1].objects[0].object_id = "1\n00".into();
        let err = validate(&model).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::ControlCharacter("object id"));
        assert_eq!(err.key, "A 1 line 2");
    }

    #[test]
    fn test_empty_program_name_is_allowed() {
        let mut model = valid_model();
        model.identification.program_name.clear();
        model.identification.program_version.clear();
        assert!(validate(&model).is_ok());
    }

    #[test]
    fn test_checks_run_in_order() {
        let mut model = valid_model();
        model.identification.company_name = None;
        model.journal_entries.clear();
        assert_eq!(code_of(&model), 2101);
    }
}
