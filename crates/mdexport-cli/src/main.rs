//! mdexport CLI
//!
//! Mirrors Markdown folders into PDF folders using pandoc or typst.

mod cli;
mod commands;
mod error;
mod interactive;
mod logging;
mod reporter;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands, ConfigAction};
use commands::SyncOptions;
use error::Result;
use mdexport_core::ConverterKind;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.config),
        None => {
            // No command provided - show help hint
            println!("{} Markdown to PDF mirroring", "mdexport".green().bold());
            println!();
            println!("Run {} for available commands.", "mdexport --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, config: Option<std::path::PathBuf>) -> Result<()> {
    match cmd {
        Commands::Sync {
            converter,
            on_stale,
            dry_run,
            json,
        } => {
            let path = commands::config_path(config)?;
            commands::run_sync(
                &path,
                SyncOptions {
                    converter: converter.map(Into::into),
                    on_stale: on_stale.into(),
                    dry_run,
                    json,
                },
            )
        }
        Commands::Config { action } => {
            let path = commands::config_path(config)?;
            match action {
                ConfigAction::Add { input, output } => commands::run_add(&path, &input, &output),
                ConfigAction::Remove { input } => commands::run_remove(&path, &input),
                ConfigAction::List => commands::run_list(&path),
                ConfigAction::SetPandoc(args) => {
                    commands::run_set_converter(&path, ConverterKind::Pandoc, args)
                }
                ConfigAction::SetTypst(args) => {
                    commands::run_set_converter(&path, ConverterKind::Typst, args)
                }
                ConfigAction::Path => commands::run_path(&path),
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "mdexport", &mut std::io::stdout());
            Ok(())
        }
    }
}
