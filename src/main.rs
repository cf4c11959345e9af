use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sie4i::cli::{handle_file_command, FileCommands};
use sie4i::config::{paths::Sie4iPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "sie4i",
    author = "Kaylee Beyene",
    version,
    about = "SIE 4I accounting export parser, validator and writer",
    long_about = "sie4i reads SIE 4I record streams (codepage 437 journal exports), \
                  validates them, and writes them back out or converts them to \
                  and from a flat JSON form."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    File(FileCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Sie4iPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::File(cmd)) => {
            handle_file_command(&settings, cmd)?;
        }
        Some(Commands::Config) => {
            println!("sie4i Configuration");
            println!("===================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Write checksum:  {}", settings.write_checksum);
            println!("  Line ending:     {:?}", settings.line_ending);
            println!(
                "  Program:         {} {}",
                settings.program_name, settings.program_version
            );
        }
        None => {
            println!("sie4i - SIE 4I accounting export converter");
            println!();
            println!("Run 'sie4i --help' for usage information.");
        }
    }

    Ok(())
}
