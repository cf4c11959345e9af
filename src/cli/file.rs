//! Record stream file commands
//!
//! Implements the check, rewrite and JSON conversion commands on files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

use crate::config::Settings;
use crate::error::Sie4iResult;
use crate::models::Sie4iModel;
use crate::projection;
use crate::services::{parse_bytes, validate, write_bytes, Parsed, WriteOptions};

/// File subcommands
#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Parse and validate a record stream, then print a summary
    Check {
        /// Record stream file
        input: PathBuf,
    },
    /// Parse, validate and write a record stream back out
    Rewrite {
        /// Record stream file to read
        input: PathBuf,
        /// File to write
        output: PathBuf,
        /// Write a checksum even if the input had none
        #[arg(long)]
        checksum: bool,
    },
    /// Convert a record stream to flat JSON
    #[command(name = "to-json")]
    ToJson {
        /// Record stream file
        input: PathBuf,
        /// Write JSON here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert flat JSON to a record stream
    #[command(name = "from-json")]
    FromJson {
        /// JSON file
        input: PathBuf,
        /// Record stream file to write
        output: PathBuf,
        /// Write a checksum
        #[arg(long)]
        checksum: bool,
    },
}

/// Handle file commands
pub fn handle_file_command(settings: &Settings, cmd: FileCommands) -> Sie4iResult<()> {
    match cmd {
        FileCommands::Check { input } => {
            let parsed = read_stream(&input)?;
            print!("{}", format_summary(&parsed));
        }
        FileCommands::Rewrite {
            input,
            output,
            checksum,
        } => {
            let parsed = read_stream(&input)?;
            let options = WriteOptions::from_settings(settings)
                .with_checksum(checksum || parsed.checksum_mode || settings.write_checksum);
            write_stream(&output, &parsed.model, &options)?;
            println!("Wrote {}", output.display());
        }
        FileCommands::ToJson { input, output } => {
            let parsed = read_stream(&input)?;
            match output {
                Some(path) => {
                    let json = projection::to_json(&parsed.model)?;
                    fs::write(&path, json)?;
                    println!("Wrote {}", path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    projection::write_json(&parsed.model, &mut handle)?;
                    writeln!(handle)?;
                }
            }
        }
        FileCommands::FromJson {
            input,
            output,
            checksum,
        } => {
            let json = fs::read_to_string(&input)?;
            let mut model = projection::from_json(&json)?;
            apply_program_defaults(&mut model, settings);
            validate(&model)?;

            let options = WriteOptions::from_settings(settings)
                .with_checksum(checksum || settings.write_checksum);
            write_stream(&output, &model, &options)?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}

fn read_stream(path: &Path) -> Sie4iResult<Parsed> {
    let bytes = fs::read(path)?;
    let parsed = parse_bytes(&bytes)?;
    info!(path = %path.display(), "record stream read");
    Ok(parsed)
}

fn write_stream(path: &Path, model: &Sie4iModel, options: &WriteOptions) -> Sie4iResult<()> {
    let bytes = write_bytes(model, options)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), checksum = options.checksum, "record stream written");
    Ok(())
}

/// Fill in a missing program identification from settings
fn apply_program_defaults(model: &mut Sie4iModel, settings: &Settings) {
    let id = &mut model.identification;
    if id.program_name.is_empty() {
        id.program_name = settings.program_name.clone();
    }
    if id.program_version.is_empty() {
        id.program_version = settings.program_version.clone();
    }
}

/// Human-readable summary of a parsed stream
pub fn format_summary(parsed: &Parsed) -> String {
    let model = &parsed.model;
    let id = &model.identification;
    let mut out = String::new();

    out.push_str(&format!(
        "Company:         {}\n",
        id.company_name.as_deref().unwrap_or("-")
    ));
    if let Some(org) = &id.organization_id {
        out.push_str(&format!("Organization:    {}\n", org));
    }
    out.push_str(&format!(
        "Program:         {} {}\n",
        id.program_name, id.program_version
    ));
    if let Some(generated) = id.generated {
        out.push_str(&format!("Generated:       {}\n", generated));
    }
    out.push_str(&format!("Accounts:        {}\n", model.accounts.len()));
    out.push_str(&format!("Dimensions:      {}\n", model.dimensions.len()));
    out.push_str(&format!("Objects:         {}\n", model.dimension_objects.len()));
    out.push_str(&format!("Journal entries: {}\n", model.journal_entries.len()));
    out.push_str(&format!("Ledger lines:    {}\n", model.ledger_line_count()));

    let unbalanced = model
        .journal_entries
        .iter()
        .filter(|e| !e.balance().is_zero())
        .count();
    if unbalanced > 0 {
        out.push_str(&format!("Unbalanced:      {}\n", unbalanced));
    }
    out.push_str(&format!(
        "Checksum:        {}\n",
        if parsed.checksum_mode { "yes" } else { "no" }
    ));
    out
}
