//! Record stream parser
//!
//! Consumes decoded lines through a four-group state machine and builds a
//! [`Sie4iModel`]. Identification facts are written straight into the model.
//! Chart-data facts (`#KONTO`, `#KTYP`, `#ENHET`, `#DIM`, `#OBJEKT`) may
//! arrive in any order, so they are collected in pending builders and only
//! turned into entities when the ledger-data group starts (or the stream
//! ends). Journal entries and ledger lines are appended as they are read.

use std::collections::BTreeMap;
use std::fmt;
use std::mem;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{ParseError, ParseErrorKind};
use crate::format::grammar::{self, Field};
use crate::format::{Group, Label};
use crate::models::{
    Account, AccountNumber, AccountType, Dimension, DimensionObject, JournalEntry, LedgerLine,
    ObjectRef, Sie4iModel,
};

/// Accepted date layouts, wire form first
const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// Number of `#KSUMMA` records that marks a checksummed stream
const CHECKSUM_MARKERS: usize = 2;

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub model: Sie4iModel,
    /// True when the stream carried exactly two `#KSUMMA` records
    pub checksum_mode: bool,
}

/// Parse a sequence of decoded lines
pub fn parse<I, S>(lines: I) -> Result<Parsed, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new();
    for line in lines {
        parser.parse_line(line.as_ref())?;
    }
    parser.finish()
}

type Handler = fn(&mut Parser, Label, &[Field]) -> Result<(), ParseErrorKind>;

/// The label a continuation line re-dispatches to, and its handler
#[derive(Clone, Copy)]
struct Continuation {
    label: Label,
    handler: Handler,
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("label", &self.label)
            .finish()
    }
}

#[derive(Debug, Default)]
struct PendingAccount {
    name: Option<String>,
    account_type: Option<AccountType>,
    unit: Option<String>,
}

#[derive(Debug, Default)]
struct PendingDimension {
    name: Option<String>,
    /// Object id to object name
    objects: BTreeMap<String, String>,
}

/// Incremental record stream parser
#[derive(Debug)]
pub struct Parser {
    group: Group,
    model: Sie4iModel,
    accounts: BTreeMap<AccountNumber, PendingAccount>,
    dimensions: BTreeMap<u32, PendingDimension>,
    continuation: Option<Continuation>,
    checksum_markers: usize,
    records: usize,
    /// Last non-blank raw line, reported by end-of-stream errors
    last_line: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            group: Group::NotStarted,
            model: Sie4iModel::default(),
            accounts: BTreeMap::new(),
            dimensions: BTreeMap::new(),
            continuation: None,
            checksum_markers: 0,
            records: 0,
            last_line: String::new(),
        }
    }

    /// Current position in the stream
    pub fn group(&self) -> Group {
        self.group
    }

    /// Feed one decoded line
    pub fn parse_line(&mut self, raw: &str) -> Result<(), ParseError> {
        self.dispatch(raw).map_err(|kind| ParseError::new(kind, raw))?;
        if !raw.trim().is_empty() {
            self.last_line.clear();
            self.last_line.push_str(raw);
        }
        Ok(())
    }

    /// End of stream: flush pending chart data and hand over the model
    pub fn finish(mut self) -> Result<Parsed, ParseError> {
        if self.records == 0 {
            return Err(ParseError::new(ParseErrorKind::EmptyInput, ""));
        }
        if self.group == Group::NotStarted {
            return Err(ParseError::new(
                ParseErrorKind::ContentBeforeStart,
                self.last_line,
            ));
        }
        if let Err(kind) = self.flush_chart_data() {
            return Err(ParseError::new(kind, self.last_line));
        }

        let checksum_mode = self.checksum_markers == CHECKSUM_MARKERS;
        debug!(
            accounts = self.model.accounts.len(),
            entries = self.model.journal_entries.len(),
            checksum_mode,
            "parse finished"
        );
        Ok(Parsed {
            model: self.model,
            checksum_mode,
        })
    }

    fn dispatch(&mut self, raw: &str) -> Result<(), ParseErrorKind> {
        let Some(line) = grammar::tokenize(raw)? else {
            return Ok(());
        };
        self.records += 1;

        match line.label {
            Some(tag) => {
                let label =
                    Label::from_tag(&tag).ok_or_else(|| ParseErrorKind::UnknownLabel(tag.clone()))?;
                self.enter(label)?;
                let handler = handler_for(label);
                self.continuation = Some(Continuation { label, handler });
                handler(self, label, &line.fields)
            }
            None => {
                if self.group == Group::NotStarted {
                    return Err(ParseErrorKind::ContentBeforeStart);
                }
                if line.is_brace_marker() {
                    return Ok(());
                }
                match self.continuation {
                    Some(Continuation { label, handler }) => handler(self, label, &line.fields),
                    None => Err(ParseErrorKind::ContentBeforeStart),
                }
            }
        }
    }

    /// Move the state machine for a labelled record
    fn enter(&mut self, label: Label) -> Result<(), ParseErrorKind> {
        let Some(target) = label.group() else {
            self.checksum_markers += 1;
            return Ok(());
        };

        if self.group == Group::NotStarted && target != Group::Started {
            return Err(ParseErrorKind::ContentBeforeStart);
        }
        if target < self.group {
            return Err(ParseErrorKind::GroupRegression {
                label: label.tag().to_string(),
                current: self.group.number(),
            });
        }
        if target > self.group {
            if target == Group::LedgerData {
                self.flush_chart_data()?;
            }
            debug!(
                from = self.group.number(),
                to = target.number(),
                "group transition"
            );
            self.group = target;
        }
        Ok(())
    }

    /// Turn pending chart-data builders into sorted entities
    fn flush_chart_data(&mut self) -> Result<(), ParseErrorKind> {
        if self.accounts.is_empty() && self.dimensions.is_empty() {
            return Ok(());
        }
        debug!(
            accounts = self.accounts.len(),
            dimensions = self.dimensions.len(),
            "flushing chart data"
        );

        for (number, pending) in mem::take(&mut self.accounts) {
            let name = pending.name.ok_or_else(|| incomplete("Account", &number, "name"))?;
            let account_type = pending
                .account_type
                .ok_or_else(|| incomplete("Account", &number, "type"))?;
            let mut account = Account::new(number, name, account_type);
            account.unit = pending.unit;
            self.model.add_account(account);
        }

        for (id, pending) in mem::take(&mut self.dimensions) {
            let name = pending.name.ok_or_else(|| incomplete("Dimension", &id, "name"))?;
            self.model.add_dimension(Dimension::new(id, name));
            for (object_id, object_name) in pending.objects {
                self.model
                    .add_dimension_object(DimensionObject::new(id, object_id, object_name));
            }
        }
        Ok(())
    }

    fn ignore(&mut self, _label: Label, _fields: &[Field]) -> Result<(), ParseErrorKind> {
        Ok(())
    }

    fn discard(&mut self, label: Label, _fields: &[Field]) -> Result<(), ParseErrorKind> {
        warn!(label = %label, "discarding retroactive transaction record");
        Ok(())
    }

    // Identification

    fn read_program(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let id = &mut self.model.identification;
        id.program_name = text_at(fields, 1).unwrap_or_default().to_string();
        id.program_version = text_at(fields, 2).unwrap_or_default().to_string();
        Ok(())
    }

    fn read_generated(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let date = parse_date(label, required(label, fields, 1)?)?;
        let id = &mut self.model.identification;
        id.generated = Some(date);
        id.signer = text_at(fields, 2).map(str::to_string);
        Ok(())
    }

    fn read_sie_type(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let value = required(label, fields, 1)?;
        if value != "4" {
            return Err(ParseErrorKind::UnsupportedSieType(value.to_string()));
        }
        Ok(())
    }

    fn read_client_id(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        self.model.identification.client_id = Some(required(label, fields, 1)?.to_string());
        Ok(())
    }

    fn read_organization(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let organization_id = required(label, fields, 1)?.to_string();
        let sequence = match text_at(fields, 2) {
            Some(value) => parse_number(label, value)?,
            None => 1,
        };
        let id = &mut self.model.identification;
        id.organization_id = Some(organization_id);
        id.organization_sequence = sequence;
        Ok(())
    }

    fn read_company_name(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        self.model.identification.company_name = Some(required(label, fields, 1)?.to_string());
        Ok(())
    }

    fn read_currency(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        self.model.identification.currency = Some(required(label, fields, 1)?.to_string());
        Ok(())
    }

    // Chart data

    fn pending_account(
        &mut self,
        label: Label,
        fields: &[Field],
    ) -> Result<&mut PendingAccount, ParseErrorKind> {
        let number = parse_account_number(label, required(label, fields, 1)?)?;
        Ok(self.accounts.entry(number).or_default())
    }

    fn pending_dimension(
        &mut self,
        label: Label,
        fields: &[Field],
    ) -> Result<&mut PendingDimension, ParseErrorKind> {
        let id = parse_number(label, required(label, fields, 1)?)?;
        Ok(self.dimensions.entry(id).or_default())
    }

    fn read_account_name(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let name = required(label, fields, 2)?.to_string();
        self.pending_account(label, fields)?.name = Some(name);
        Ok(())
    }

    fn read_account_type(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let code = required(label, fields, 2)?;
        let account_type = AccountType::from_code(code)
            .ok_or_else(|| ParseErrorKind::InvalidAccountType(code.to_string()))?;
        self.pending_account(label, fields)?.account_type = Some(account_type);
        Ok(())
    }

    fn read_account_unit(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let unit = required(label, fields, 2)?.to_string();
        self.pending_account(label, fields)?.unit = Some(unit);
        Ok(())
    }

    fn read_dimension(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let name = required(label, fields, 2)?.to_string();
        self.pending_dimension(label, fields)?.name = Some(name);
        Ok(())
    }

    fn read_object(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let object_id = required(label, fields, 2)?.to_string();
        let name = required(label, fields, 3)?.to_string();
        self.pending_dimension(label, fields)?
            .objects
            .insert(object_id, name);
        Ok(())
    }

    // Ledger data

    fn read_entry(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let date = parse_date(label, required(label, fields, 3)?)?;
        let entry = JournalEntry {
            series: text_at(fields, 1).map(str::to_string),
            sequence: text_at(fields, 2)
                .map(|value| parse_number(label, value))
                .transpose()?,
            date: Some(date),
            text: text_at(fields, 4).map(str::to_string),
            registration_date: text_at(fields, 5)
                .map(|value| parse_date(label, value))
                .transpose()?,
            signer: text_at(fields, 6).map(str::to_string),
            lines: Vec::new(),
        };
        self.model.add_journal_entry(entry);
        Ok(())
    }

    fn read_ledger_line(&mut self, label: Label, fields: &[Field]) -> Result<(), ParseErrorKind> {
        let objects = match fields.get(1) {
            Some(Field::ObjectList(items)) => object_refs(label, items)?,
            Some(Field::Text(value)) if value.is_empty() => Vec::new(),
            None => Vec::new(),
            Some(Field::Text(_)) => {
                return Err(ParseErrorKind::MissingField {
                    label: label.tag().to_string(),
                    position: 2,
                })
            }
        };

        let line = LedgerLine {
            account: text_at(fields, 1)
                .map(|value| parse_account_number(label, value))
                .transpose()?,
            objects,
            amount: text_at(fields, 3)
                .map(|value| parse_decimal(label, value))
                .transpose()?,
            date: text_at(fields, 4)
                .map(|value| parse_date(label, value))
                .transpose()?,
            text: text_at(fields, 5).map(str::to_string),
            quantity: text_at(fields, 6)
                .map(|value| parse_decimal(label, value))
                .transpose()?,
            signer: text_at(fields, 7).map(str::to_string),
        };

        let entry = self
            .model
            .journal_entries
            .last_mut()
            .ok_or(ParseErrorKind::TransactionOutsideEntry)?;
        entry.push_line(line);
        Ok(())
    }
}

fn handler_for(label: Label) -> Handler {
    match label {
        Label::Program => Parser::read_program,
        Label::Gen => Parser::read_generated,
        Label::Sietyp => Parser::read_sie_type,
        Label::Fnr => Parser::read_client_id,
        Label::Orgnr => Parser::read_organization,
        Label::Fnamn => Parser::read_company_name,
        Label::Valuta => Parser::read_currency,
        Label::Konto => Parser::read_account_name,
        Label::Ktyp => Parser::read_account_type,
        Label::Enhet => Parser::read_account_unit,
        Label::Dim => Parser::read_dimension,
        Label::Objekt => Parser::read_object,
        Label::Ver => Parser::read_entry,
        Label::Trans => Parser::read_ledger_line,
        Label::Rtrans | Label::Btrans => Parser::discard,
        Label::Flagga
        | Label::Ksumma
        | Label::Format
        | Label::Prosa
        | Label::Ftyp
        | Label::Adress
        | Label::Rar
        | Label::Taxar
        | Label::Kptyp
        | Label::Sru
        | Label::Underdim => Parser::ignore,
    }
}

/// Non-empty text of the field at 1-based `position`
fn text_at(fields: &[Field], position: usize) -> Option<&str> {
    fields
        .get(position.checked_sub(1)?)
        .and_then(Field::as_text)
        .filter(|value| !value.is_empty())
}

fn required(label: Label, fields: &[Field], position: usize) -> Result<&str, ParseErrorKind> {
    text_at(fields, position).ok_or_else(|| ParseErrorKind::MissingField {
        label: label.tag().to_string(),
        position,
    })
}

fn invalid_number(label: Label, value: &str) -> ParseErrorKind {
    ParseErrorKind::InvalidNumber {
        label: label.tag().to_string(),
        value: value.to_string(),
    }
}

fn parse_number<T: FromStr>(label: Label, value: &str) -> Result<T, ParseErrorKind> {
    value.parse().map_err(|_| invalid_number(label, value))
}

fn parse_decimal(label: Label, value: &str) -> Result<Decimal, ParseErrorKind> {
    Decimal::from_str(value).map_err(|_| invalid_number(label, value))
}

fn parse_account_number(label: Label, value: &str) -> Result<AccountNumber, ParseErrorKind> {
    AccountNumber::parse(value).map_err(|_| invalid_number(label, value))
}

/// Parse a date, trying each accepted layout in turn
fn parse_date(label: Label, value: &str) -> Result<NaiveDate, ParseErrorKind> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| ParseErrorKind::InvalidDate {
            label: label.tag().to_string(),
            value: value.to_string(),
        })
}

/// Unpack an object list pairwise
fn object_refs(label: Label, items: &[String]) -> Result<Vec<ObjectRef>, ParseErrorKind> {
    let pairs = items.chunks_exact(2);
    if let [unpaired] = pairs.remainder() {
        return Err(ParseErrorKind::UnpairedObjectReference(unpaired.clone()));
    }
    pairs
        .map(|pair| {
            let dimension_id: u32 = parse_number(label, &pair[0])?;
            Ok::<_, ParseErrorKind>(ObjectRef::new(dimension_id, pair[1].clone()))
        })
        .collect()
}

fn incomplete(entity: &'static str, key: &impl ToString, field: &'static str) -> ParseErrorKind {
    ParseErrorKind::IncompleteRecord {
        entity,
        key: key.to_string(),
        field,
    }
}
