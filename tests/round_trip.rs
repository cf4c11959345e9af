use chrono::NaiveDate;
use rust_decimal::Decimal;

use sie4i::format::ChecksumEngine;
use sie4i::models::{
    Account, AccountNumber, AccountType, Dimension, DimensionObject, Identification, JournalEntry,
    LedgerLine,
};
use sie4i::services::{parse_lines, render_lines};
use sie4i::{parse_bytes, write_bytes, Sie4iError, Sie4iModel, ValidationErrorKind, WriteOptions};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn number(s: &str) -> AccountNumber {
    AccountNumber::parse(s).unwrap()
}

fn sample_model() -> Sie4iModel {
    let mut identification = Identification::new("Räkna Ekonomi", "4.2", date(2021, 3, 31))
        .with_company_name("Åkeriet i Övik AB")
        .with_organization("556677-8899", 2);
    identification.signer = Some("Märta".into());
    identification.client_id = Some("K17".into());
    identification.currency = Some("SEK".into());

    let mut model = Sie4iModel::new(identification);
    model
        .add_account(Account::new(number("1910"), "Kassa", AccountType::Asset))
        .add_account(Account::new(number("2440"), "Leverantörsskulder", AccountType::Liability))
        .add_account(
            Account::new(number("4010"), "Inköp material", AccountType::Cost).with_unit("kg"),
        )
        .add_account(Account::new(number("3000"), "Försäljning", AccountType::Income))
        .add_dimension(Dimension::new(1, "Kostnadsställe"))
        .add_dimension(Dimension::new(6, "Projekt"))
        .add_dimension_object(DimensionObject::new(1, "100", "Verkstad"))
        .add_dimension_object(DimensionObject::new(6, "P 7", "Nya hallen"))
        .add_journal_entry(
            JournalEntry::new(date(2021, 3, 1))
                .with_series("A", 1)
                .with_text("Kontantförsäljning")
                .with_line(LedgerLine::new(number("1910"), Decimal::new(125000, 2)))
                .with_line(
                    LedgerLine::new(number("3000"), Decimal::new(-125000, 2))
                        .with_object(1, "100")
                        .with_object(6, "P 7"),
                ),
        )
        .add_journal_entry({
            let mut entry = JournalEntry::new(date(2021, 3, 5))
                .with_series("B", 12)
                .with_signer("Olle")
                .with_line(
                    LedgerLine::new(number("4010"), Decimal::new(40000, 2))
                        .with_date(date(2021, 3, 4))
                        .with_text("Stål \"extra\"")
                        .with_quantity(Decimal::new(125, 1)),
                )
                .with_line(LedgerLine::new(number("2440"), Decimal::new(-40000, 2)));
            entry.registration_date = Some(date(2021, 3, 6));
            entry.lines[1].signer = Some("Olle".into());
            entry
        })
        .add_journal_entry(
            JournalEntry::new(date(2021, 3, 9))
                .with_line(LedgerLine::new(number("1910"), Decimal::new(-5, 1)))
                .with_line(LedgerLine::new(number("4010"), Decimal::new(5, 1))),
        );
    model
}

fn options(checksum: bool) -> WriteOptions {
    WriteOptions::default().with_checksum(checksum)
}

#[test]
fn round_trip_preserves_model() {
    let model = sample_model();
    for checksum in [false, true] {
        let bytes = write_bytes(&model, &options(checksum)).unwrap();
        let parsed = parse_bytes(&bytes).unwrap();
        assert_eq!(parsed.model, model);
        assert_eq!(parsed.checksum_mode, checksum);
    }
}

#[test]
fn defaulted_fields_are_unobservable() {
    let mut model = sample_model();
    let entry = &mut model.journal_entries[0];
    entry.registration_date = entry.date;
    entry.signer = Some("Märta".into());
    entry.lines[0].date = entry.date;

    let bytes = write_bytes(&model, &options(false)).unwrap();
    let parsed = parse_bytes(&bytes).unwrap().model;
    let entry = &parsed.journal_entries[0];
    assert_eq!(entry.registration_date, None);
    assert_eq!(entry.registration_date_or_entry(), Some(date(2021, 3, 1)));
    assert_eq!(entry.signer, None);
    assert_eq!(entry.signer_or(parsed.identification.effective_signer()), "Märta");
    assert_eq!(entry.lines[0].date_or(date(2021, 3, 1)), date(2021, 3, 1));
}

#[test]
fn checksum_is_idempotent() {
    let model = sample_model();
    let first = render_lines(&model, true).unwrap();
    let second = render_lines(&model, true).unwrap();
    assert_eq!(first.lines.last(), second.lines.last());
    assert_eq!(first.checksum_value(), second.checksum_value());
    assert_eq!(
        write_bytes(&model, &options(true)).unwrap(),
        write_bytes(&model, &options(true)).unwrap()
    );
}

#[test]
fn checksum_changes_with_content() {
    let model = sample_model();
    let mut changed = sample_model();
    changed.accounts[0].name = "Kassa 2".into();
    assert_ne!(
        render_lines(&model, true).unwrap().checksum_value(),
        render_lines(&changed, true).unwrap().checksum_value()
    );
}

#[test]
fn chart_data_order_does_not_matter() {
    let head = [
        "#FLAGGA 0",
        "#PROGRAM Prog 1.0",
        "#GEN 20210115",
        "#SIETYP 4",
        "#FNAMN Bolaget",
    ];
    let chart = [
        "#KONTO 3000 Försäljning",
        "#KTYP 3000 I",
        "#DIM 6 Projekt",
        "#OBJEKT 6 P2 Två",
        "#KONTO 1910 Kassa",
        "#ENHET 1910 st",
        "#KTYP 1910 T",
        "#OBJEKT 6 P1 Ett",
        "#DIM 1 Avdelning",
    ];
    let tail = [
        "#VER A 1 20210105",
        "{",
        "#TRANS 1910 {6 P1} 10.00",
        "#TRANS 3000 {} -10.00",
        "}",
    ];

    let build = |chart: &[&str]| {
        let lines: Vec<&str> = head
            .iter()
            .chain(chart.iter())
            .chain(tail.iter())
            .copied()
            .collect();
        parse_lines(lines).unwrap().model
    };

    let expected = build(&chart[..]);
    let mut reversed = chart;
    reversed.reverse();
    assert_eq!(build(&reversed[..]), expected);

    let mut rotated = chart;
    rotated.rotate_left(4);
    assert_eq!(build(&rotated[..]), expected);
}

#[test]
fn scenario_entry_with_blank_series() {
    let lines = [
        "#FLAGGA 0",
        "#PROGRAM Prog 1.0",
        "#SIETYP 4",
        "#FNAMN Bolaget",
        "#KONTO 1910 Kassa",
        "#KTYP 1910 T",
        "#VER \"\" \"\" 2021-01-01 \"text\" \"\" \"\"",
        "{",
        "#TRANS 1910 {} 100.00",
        "}",
    ];
    let model = parse_lines(lines).unwrap().model;
    assert_eq!(model.journal_entries.len(), 1);
    let entry = &model.journal_entries[0];
    assert_eq!(entry.date, Some(date(2021, 1, 1)));
    assert_eq!(entry.series, None);
    assert_eq!(entry.sequence, None);
    assert_eq!(entry.signer, None);
    assert_eq!(entry.lines.len(), 1);
    let line = &entry.lines[0];
    assert_eq!(line.account, Some(number("1910")));
    assert_eq!(line.amount, Some(Decimal::new(10000, 2)));
    assert_eq!(line.date_or(date(2021, 1, 1)), date(2021, 1, 1));
}

#[test]
fn scenario_account_facts_in_reverse_order() {
    let lines = [
        "#FLAGGA 0",
        "#PROGRAM Prog 1.0",
        "#SIETYP 4",
        "#FNAMN Bolaget",
        "#ENHET 1510 st",
        "#KONTO 1510 \"Kundfordringar\"",
        "#KTYP 1510 T",
        "#VER A 1 20210101",
        "{",
        "#TRANS 1510 {} 100.00",
        "}",
    ];
    let model = parse_lines(lines).unwrap().model;
    assert_eq!(
        model.accounts,
        vec![Account::new(number("1510"), "Kundfordringar", AccountType::Asset).with_unit("st")]
    );
}

#[test]
fn scenario_no_journal_entries_is_rejected() {
    let mut model = sample_model();
    model.journal_entries.clear();
    let err = write_bytes(&model, &options(true)).unwrap_err();
    match err {
        Sie4iError::Validation(e) => {
            assert_eq!(e.kind, ValidationErrorKind::NoJournalEntries);
            assert!(e.to_string().contains("no ledger entries"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scenario_checksum_matches_basis() {
    let rendered = render_lines(&sample_model(), true).unwrap();
    let markers = rendered
        .lines
        .iter()
        .filter(|l| l.starts_with("#KSUMMA"))
        .count();
    assert_eq!(markers, 2);

    let engine = rendered.checksum.as_ref().unwrap();
    let mut recomputed = ChecksumEngine::new();
    recomputed.append(engine.basis());
    let expected = crc32fast::hash(engine.basis());
    assert_eq!(recomputed.compute(), expected);
    assert_eq!(
        rendered.lines.last().map(String::as_str),
        Some(format!("#KSUMMA {}", expected).as_str())
    );
}

#[test]
fn edge_text_values_round_trip() {
    let cases: Vec<(&str, fn(&mut Sie4iModel))> = vec![
        ("empty program", |m| {
            m.identification.program_name.clear();
            m.identification.program_version.clear();
        }),
        ("trailing backslash", |m| {
            m.journal_entries[0].text = Some(r"C:\temp dir\".into());
        }),
        ("escaped quote and backslash", |m| {
            m.accounts[0].name = r#"Kassa \"A\" \\"#.into();
        }),
        ("bare backslash", |m| {
            m.journal_entries[1].lines[0].text = Some(r"a\b".into());
        }),
        ("backslash in object id", |m| {
            m.dimension_objects[1].object_id = r"P \7".into();
            m.journal_entries[0].lines[1].objects[1].object_id = r"P \7".into();
        }),
        ("leading sigil", |m| {
            m.journal_entries[2].text = Some("#1 kund".into());
        }),
        ("braces in text", |m| {
            m.journal_entries[0].lines[0].text = Some("{inte} en lista".into());
        }),
        ("surrounding spaces", |m| {
            m.identification.company_name = Some(" Åkeriet ".into());
        }),
        ("series with space", |m| {
            m.journal_entries[1].series = Some("B 2".into());
        }),
    ];

    for (name, mutate) in cases {
        let mut model = sample_model();
        mutate(&mut model);
        for checksum in [false, true] {
            let bytes = write_bytes(&model, &options(checksum)).unwrap();
            let parsed = parse_bytes(&bytes)
                .unwrap_or_else(|e| panic!("{name} (checksum {checksum}): {e}"));
            assert_eq!(parsed.model, model, "{name} (checksum {checksum})");
        }
    }
}

#[test]
fn empty_optional_text_reads_back_as_absent() {
    let mut model = sample_model();
    model.identification.client_id = Some(String::new());
    model.identification.currency = Some(String::new());
    model.accounts[2].unit = Some(String::new());
    model.journal_entries[0].text = Some(String::new());
    model.journal_entries[1].lines[1].signer = Some(String::new());

    let bytes = write_bytes(&model, &options(false)).unwrap();
    let parsed = parse_bytes(&bytes).unwrap().model;
    assert_eq!(parsed.identification.client_id, None);
    assert_eq!(parsed.identification.currency, None);
    assert_eq!(parsed.accounts[2].unit, None);
    assert_eq!(parsed.journal_entries[0].text, None);
    assert_eq!(parsed.journal_entries[1].lines[1].signer, None);
}

#[test]
fn control_characters_are_refused_before_writing() {
    let cases: Vec<(&str, fn(&mut Sie4iModel))> = vec![
        ("line feed", |m| m.journal_entries[0].text = Some("rad1\nrad2".into())),
        ("carriage return", |m| m.accounts[1].name = "Lev\rskuld".into()),
        ("tab", |m| m.journal_entries[1].lines[0].text = Some("a\tb".into())),
        ("nul", |m| m.identification.program_name = "Räkna\0".into()),
    ];

    for (name, mutate) in cases {
        let mut model = sample_model();
        mutate(&mut model);
        match write_bytes(&model, &options(true)) {
            Err(Sie4iError::Validation(e)) => {
                assert!(
                    matches!(e.kind, ValidationErrorKind::ControlCharacter(_)),
                    "{name}: {e}"
                );
            }
            other => panic!("{name}: expected a validation error, got {other:?}"),
        }
    }
}
