//! Flat key/array projection of a model
//!
//! A [`FlatMap`] is the shape HTTP-style callers deal in: identification
//! facts are scalar keys, and every entity kind is a set of parallel arrays
//! sharing one index per instance. Ledger lines nest one level deeper,
//! indexed by entry and then by line.
//!
//! Converting from a flat map checks only that values are well-formed;
//! completeness is left to the validator.

pub mod json;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Sie4iError, Sie4iResult};
use crate::models::{
    Account, AccountNumber, AccountType, Dimension, DimensionObject, Identification,
    JournalEntry, LedgerLine, ObjectRef, Sie4iModel,
};

pub use json::{from_json, to_json, write_json};

const DATE_FORMAT: &str = "%Y%m%d";

/// Key to array-of-values view of a [`Sie4iModel`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    // Accounts
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub account_number: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub account_name: Vec<Option<String>>,
    /// Single-letter type code
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub account_type: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub account_unit: Vec<Option<String>>,

    // Dimensions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension_id: Vec<Option<u32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension_name: Vec<Option<String>>,

    // Dimension objects
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub object_dimension_id: Vec<Option<u32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub object_id: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub object_name: Vec<Option<String>>,

    // Journal entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_series: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_sequence: Vec<Option<u64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_date: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_text: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_registration_date: Vec<Option<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_signer: Vec<Option<String>>,

    // Ledger lines, indexed [entry][line]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_account: Vec<Vec<Option<String>>>,
    /// Object pairs, indexed [entry][line][pair]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_dimension_id: Vec<Vec<Vec<u32>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_object_id: Vec<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_amount: Vec<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_date: Vec<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_text: Vec<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_quantity: Vec<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_signer: Vec<Vec<Option<String>>>,
}

/// Project a model onto a flat map
pub fn to_flat(model: &Sie4iModel) -> FlatMap {
    let id = &model.identification;
    let mut flat = FlatMap {
        program_name: non_empty(&id.program_name),
        program_version: non_empty(&id.program_version),
        generated: id.generated.map(format_date),
        signer: id.signer.clone(),
        client_id: id.client_id.clone(),
        organization_id: id.organization_id.clone(),
        organization_sequence: id
            .organization_id
            .as_ref()
            .map(|_| id.organization_sequence),
        company_name: id.company_name.clone(),
        currency: id.currency.clone(),
        ..FlatMap::default()
    };

    for account in &model.accounts {
        flat.account_number.push(Some(account.number.to_string()));
        flat.account_name.push(non_empty(&account.name));
        flat.account_type
            .push(account.account_type.map(|t| t.code().to_string()));
        flat.account_unit.push(account.unit.clone());
    }

    for dimension in &model.dimensions {
        flat.dimension_id.push(Some(dimension.id));
        flat.dimension_name.push(non_empty(&dimension.name));
    }

    for object in &model.dimension_objects {
        flat.object_dimension_id.push(Some(object.dimension_id));
        flat.object_id.push(non_empty(&object.object_id));
        flat.object_name.push(non_empty(&object.name));
    }

    for entry in &model.journal_entries {
        flat.entry_series.push(entry.series.clone());
        flat.entry_sequence.push(entry.sequence);
        flat.entry_date.push(entry.date.map(format_date));
        flat.entry_text.push(entry.text.clone());
        flat.entry_registration_date
            .push(entry.registration_date.map(format_date));
        flat.entry_signer.push(entry.signer.clone());

        let lines = &entry.lines;
        flat.line_account.push(
            lines
                .iter()
                .map(|l| l.account.as_ref().map(|a| a.to_string()))
                .collect(),
        );
        flat.line_dimension_id.push(
            lines
                .iter()
                .map(|l| l.objects.iter().map(|o| o.dimension_id).collect())
                .collect(),
        );
        flat.line_object_id.push(
            lines
                .iter()
                .map(|l| l.objects.iter().map(|o| o.object_id.clone()).collect())
                .collect(),
        );
        flat.line_amount.push(
            lines
                .iter()
                .map(|l| l.amount.map(|a| format!("{:.2}", a.round_dp(2))))
                .collect(),
        );
        flat.line_date
            .push(lines.iter().map(|l| l.date.map(format_date)).collect());
        flat.line_text
            .push(lines.iter().map(|l| l.text.clone()).collect());
        flat.line_quantity.push(
            lines
                .iter()
                .map(|l| l.quantity.map(|q| q.normalize().to_string()))
                .collect(),
        );
        flat.line_signer
            .push(lines.iter().map(|l| l.signer.clone()).collect());
    }

    flat
}

/// Build a model from a flat map without validating it
pub fn from_flat(flat: &FlatMap) -> Sie4iResult<Sie4iModel> {
    let identification = Identification {
        program_name: flat.program_name.clone().unwrap_or_default(),
        program_version: flat.program_version.clone().unwrap_or_default(),
        generated: flat
            .generated
            .as_deref()
            .map(|d| parse_date("generated", d))
            .transpose()?,
        signer: flat.signer.clone(),
        client_id: flat.client_id.clone(),
        organization_id: flat.organization_id.clone(),
        organization_sequence: flat.organization_sequence.unwrap_or(1),
        company_name: flat.company_name.clone(),
        currency: flat.currency.clone(),
    };
    let mut model = Sie4iModel::new(identification);

    let accounts = max_len(&[
        flat.account_number.len(),
        flat.account_name.len(),
        flat.account_type.len(),
        flat.account_unit.len(),
    ]);
    for i in 0..accounts {
        let number = at(&flat.account_number, i)
            .ok_or_else(|| projection(format!("account {} has no number", i)))?;
        let number = AccountNumber::parse(&number)
            .map_err(|e| projection(format!("account {}: {}", i, e)))?;
        let account_type = at(&flat.account_type, i)
            .map(|code| {
                AccountType::from_code(&code)
                    .ok_or_else(|| projection(format!("account {}: invalid type '{}'", i, code)))
            })
            .transpose()?;
        model.add_account(Account {
            number,
            name: at(&flat.account_name, i).unwrap_or_default(),
            account_type,
            unit: at(&flat.account_unit, i),
        });
    }

    let dimensions = max_len(&[flat.dimension_id.len(), flat.dimension_name.len()]);
    for i in 0..dimensions {
        let id = at(&flat.dimension_id, i)
            .ok_or_else(|| projection(format!("dimension {} has no id", i)))?;
        model.add_dimension(Dimension::new(
            id,
            at(&flat.dimension_name, i).unwrap_or_default(),
        ));
    }

    let objects = max_len(&[
        flat.object_dimension_id.len(),
        flat.object_id.len(),
        flat.object_name.len(),
    ]);
    for i in 0..objects {
        let dimension_id = at(&flat.object_dimension_id, i)
            .ok_or_else(|| projection(format!("object {} has no dimension id", i)))?;
        model.add_dimension_object(DimensionObject::new(
            dimension_id,
            at(&flat.object_id, i).unwrap_or_default(),
            at(&flat.object_name, i).unwrap_or_default(),
        ));
    }

    let entries = max_len(&[
        flat.entry_series.len(),
        flat.entry_sequence.len(),
        flat.entry_date.len(),
        flat.entry_text.len(),
        flat.entry_registration_date.len(),
        flat.entry_signer.len(),
        flat.line_account.len(),
    ]);
    for i in 0..entries {
        let entry = JournalEntry {
            series: at(&flat.entry_series, i),
            sequence: at(&flat.entry_sequence, i),
            date: at(&flat.entry_date, i)
                .map(|d| parse_date("entry_date", &d))
                .transpose()?,
            text: at(&flat.entry_text, i),
            registration_date: at(&flat.entry_registration_date, i)
                .map(|d| parse_date("entry_registration_date", &d))
                .transpose()?,
            signer: at(&flat.entry_signer, i),
            lines: lines_of(flat, i)?,
        };
        model.add_journal_entry(entry);
    }

    Ok(model)
}

fn lines_of(flat: &FlatMap, entry: usize) -> Sie4iResult<Vec<LedgerLine>> {
    let nested = |values: &Vec<Vec<Option<String>>>| values.get(entry).cloned().unwrap_or_default();
    let accounts = nested(&flat.line_account);
    let amounts = nested(&flat.line_amount);
    let dates = nested(&flat.line_date);
    let texts = nested(&flat.line_text);
    let quantities = nested(&flat.line_quantity);
    let signers = nested(&flat.line_signer);
    let dimension_ids = flat.line_dimension_id.get(entry).cloned().unwrap_or_default();
    let object_ids = flat.line_object_id.get(entry).cloned().unwrap_or_default();

    let count = max_len(&[accounts.len(), amounts.len(), dimension_ids.len()]);
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let account = at(&accounts, i)
            .map(|a| {
                AccountNumber::parse(&a)
                    .map_err(|e| projection(format!("entry {} line {}: {}", entry, i, e)))
            })
            .transpose()?;
        let dims = dimension_ids.get(i).cloned().unwrap_or_default();
        let ids = object_ids.get(i).cloned().unwrap_or_default();
        let objects = dims
            .into_iter()
            .enumerate()
            .map(|(p, dimension_id)| ObjectRef::new(dimension_id, ids.get(p).cloned().unwrap_or_default()))
            .collect();

        lines.push(LedgerLine {
            account,
            objects,
            amount: at(&amounts, i)
                .map(|a| parse_decimal("line_amount", &a))
                .transpose()?,
            date: at(&dates, i)
                .map(|d| parse_date("line_date", &d))
                .transpose()?,
            text: at(&texts, i),
            quantity: at(&quantities, i)
                .map(|q| parse_decimal("line_quantity", &q))
                .transpose()?,
            signer: at(&signers, i),
        });
    }
    Ok(lines)
}

/// The value at `index`, if the array reaches that far and it is set
fn at<T: Clone>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).cloned().flatten()
}

fn max_len(lengths: &[usize]) -> usize {
    lengths.iter().copied().max().unwrap_or(0)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn projection(message: String) -> Sie4iError {
    Sie4iError::Projection(message)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(key: &str, value: &str) -> Sie4iResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| projection(format!("{}: invalid date '{}'", key, value)))
}

fn parse_decimal(key: &str, value: &str) -> Sie4iResult<Decimal> {
    value
        .parse()
        .map_err(|_| projection(format!("{}: invalid number '{}'", key, value)))
}
