//! Record stream writer
//!
//! Renders a validated [`Sie4iModel`] as decoded text lines. Optional
//! trailing fields that hold their implied default are dropped; an optional
//! field followed by a non-default one is written as an empty `""`
//! placeholder. Empty optional text counts as absent. When checksum mode is on, every emitted field (labels
//! included, quotes excluded) is fed to a [`ChecksumEngine`] in emission
//! order and the result closes the stream.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::format::encoding;
use crate::format::grammar::quote;
use crate::format::{ChecksumEngine, Label};
use crate::models::{Account, Dimension, DimensionObject, JournalEntry, LedgerLine, ObjectRef, Sie4iModel};

const DATE_FORMAT: &str = "%Y%m%d";
const FORMAT_PC8: &str = "PC8";
const SIE_TYPE: &str = "4";

/// Output of a write
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Lines without terminators; blank separators are empty strings
    pub lines: Vec<String>,
    /// The engine the checksum was computed with, when checksum mode was on
    pub checksum: Option<ChecksumEngine>,
}

impl Rendered {
    pub fn checksum_value(&self) -> Option<u32> {
        self.checksum.as_ref().map(ChecksumEngine::compute)
    }
}

/// Render `model`. The model is expected to have passed validation.
pub fn write(model: &Sie4iModel, with_checksum: bool) -> Rendered {
    let mut writer = Writer {
        lines: Vec::new(),
        checksum: with_checksum.then(ChecksumEngine::new),
    };

    writer.raw(format!("{} 0", Label::Flagga));
    if writer.checksum.is_some() {
        writer.raw(Label::Ksumma.tag().to_string());
    }

    writer.identification(model);
    for account in &model.accounts {
        writer.account(account);
    }
    for dimension in &model.dimensions {
        writer.dimension(dimension);
    }
    for object in &model.dimension_objects {
        writer.dimension_object(object);
    }
    let signer = model.identification.effective_signer();
    for entry in &model.journal_entries {
        writer.journal_entry(entry, signer);
    }

    if let Some(engine) = &writer.checksum {
        let value = engine.compute();
        debug!(basis_len = engine.basis().len(), value, "checksum computed");
        writer.lines.push(String::new());
        writer.lines.push(format!("{} {}", Label::Ksumma, value));
    }

    Rendered {
        lines: writer.lines,
        checksum: writer.checksum,
    }
}

/// One field of an outgoing record
enum Cell {
    Text(String),
    Objects(Vec<ObjectRef>),
}

/// An outgoing record; `None` marks a field holding its default
struct Record {
    label: Label,
    fields: Vec<Option<Cell>>,
}

impl Record {
    fn new(label: Label) -> Self {
        Self {
            label,
            fields: Vec::new(),
        }
    }

    fn field(mut self, value: impl Into<String>) -> Self {
        self.fields.push(Some(Cell::Text(value.into())));
        self
    }

    fn optional(mut self, value: Option<String>) -> Self {
        self.fields
            .push(value.filter(|v| !v.is_empty()).map(Cell::Text));
        self
    }

    fn objects(mut self, objects: &[ObjectRef]) -> Self {
        self.fields.push(Some(Cell::Objects(objects.to_vec())));
        self
    }
}

struct Writer {
    lines: Vec<String>,
    checksum: Option<ChecksumEngine>,
}

impl Writer {
    fn raw(&mut self, line: String) {
        self.lines.push(line);
    }

    fn separator(&mut self) {
        self.lines.push(String::new());
    }

    fn feed(&mut self, text: &str) {
        if let Some(engine) = self.checksum.as_mut() {
            engine.append(&encoding::encode(text));
        }
    }

    /// Render one record, dropping trailing defaults
    fn emit(&mut self, mut record: Record) {
        while matches!(record.fields.last(), Some(None)) {
            record.fields.pop();
        }

        let mut line = record.label.tag().to_string();
        self.feed(record.label.tag());
        for cell in &record.fields {
            line.push(' ');
            match cell {
                None => line.push_str("\"\""),
                Some(Cell::Text(text)) => {
                    self.feed(text);
                    line.push_str(&quote(text));
                }
                Some(Cell::Objects(objects)) => {
                    let mut pairs = Vec::with_capacity(objects.len() * 2);
                    for object in objects {
                        let dimension_id = object.dimension_id.to_string();
                        self.feed(&dimension_id);
                        self.feed(&object.object_id);
                        pairs.push(dimension_id);
                        pairs.push(quote(&object.object_id));
                    }
                    line.push('{');
                    line.push_str(&pairs.join(" "));
                    line.push('}');
                }
            }
        }
        self.lines.push(line);
    }

    fn identification(&mut self, model: &Sie4iModel) {
        let id = &model.identification;

        self.emit(
            Record::new(Label::Program)
                .field(id.program_name.as_str())
                .field(id.program_version.as_str()),
        );
        self.emit(Record::new(Label::Format).field(FORMAT_PC8));

        let generated = id.generated.unwrap_or_else(|| Local::now().date_naive());
        let signer = id
            .signer
            .clone()
            .filter(|signer| *signer != id.program_name);
        self.emit(
            Record::new(Label::Gen)
                .field(format_date(generated))
                .optional(signer),
        );
        self.emit(Record::new(Label::Sietyp).field(SIE_TYPE));

        if let Some(client_id) = non_empty(&id.client_id) {
            self.emit(Record::new(Label::Fnr).field(client_id));
        }
        if let Some(organization_id) = non_empty(&id.organization_id) {
            let sequence = (id.organization_sequence != 1)
                .then(|| id.organization_sequence.to_string());
            self.emit(
                Record::new(Label::Orgnr)
                    .field(organization_id)
                    .optional(sequence),
            );
        }
        if let Some(company_name) = non_empty(&id.company_name) {
            self.emit(Record::new(Label::Fnamn).field(company_name));
        }
        if let Some(currency) = non_empty(&id.currency) {
            self.emit(Record::new(Label::Valuta).field(currency));
        }
    }

    fn account(&mut self, account: &Account) {
        let number = account.number.as_str();
        self.separator();
        self.emit(
            Record::new(Label::Konto)
                .field(number)
                .field(account.name.as_str()),
        );
        if let Some(account_type) = account.account_type {
            self.emit(
                Record::new(Label::Ktyp)
                    .field(number)
                    .field(account_type.code()),
            );
        }
        if let Some(unit) = non_empty(&account.unit) {
            self.emit(Record::new(Label::Enhet).field(number).field(unit));
        }
    }

    fn dimension(&mut self, dimension: &Dimension) {
        self.separator();
        self.emit(
            Record::new(Label::Dim)
                .field(dimension.id.to_string())
                .field(dimension.name.as_str()),
        );
    }

    fn dimension_object(&mut self, object: &DimensionObject) {
        self.separator();
        self.emit(
            Record::new(Label::Objekt)
                .field(object.dimension_id.to_string())
                .field(object.object_id.as_str())
                .field(object.name.as_str()),
        );
    }

    fn journal_entry(&mut self, entry: &JournalEntry, default_signer: &str) {
        let registration_date = entry
            .registration_date
            .filter(|date| Some(*date) != entry.date)
            .map(format_date);
        let signer = entry
            .signer
            .clone()
            .filter(|signer| signer != default_signer);

        self.separator();
        self.emit(
            Record::new(Label::Ver)
                .optional(entry.series.clone())
                .optional(entry.sequence.map(|s| s.to_string()))
                .optional(entry.date.map(format_date))
                .optional(entry.text.clone())
                .optional(registration_date)
                .optional(signer),
        );

        self.raw("{".to_string());
        for line in &entry.lines {
            self.ledger_line(line, entry.date);
        }
        self.raw("}".to_string());
    }

    fn ledger_line(&mut self, line: &LedgerLine, entry_date: Option<NaiveDate>) {
        let date = line.date.filter(|date| Some(*date) != entry_date);
        self.emit(
            Record::new(Label::Trans)
                .optional(line.account.as_ref().map(|a| a.as_str().to_string()))
                .objects(&line.objects)
                .optional(line.amount.map(format_amount))
                .optional(date.map(format_date))
                .optional(line.text.clone())
                .optional(line.quantity.map(|q| q.normalize().to_string()))
                .optional(line.signer.clone()),
        );
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Amounts are always written with two decimals
fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
