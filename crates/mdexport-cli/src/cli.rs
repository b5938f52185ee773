//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use mdexport_core::{ConverterKind, StalePolicy};

/// mdexport - Mirror Markdown folders as PDF
#[derive(Parser, Debug)]
#[command(name = "mdexport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "MDEXPORT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Mirror every configured mapping
    ///
    /// Markdown files are rendered to PDF, other files are copied, and files
    /// in the output that no longer exist in the input are offered for
    /// deletion.
    ///
    /// Examples:
    ///   mdexport sync                      # Prompt for stale files
    ///   mdexport sync --converter typst    # Render with typst this time
    ///   mdexport sync --on-stale skip      # Never delete anything
    ///   mdexport sync --dry-run            # Show what would happen
    Sync {
        /// Converter to use instead of the configured one
        #[arg(long, value_enum)]
        converter: Option<ConverterArg>,

        /// What to do with output files that have no input counterpart
        #[arg(long, value_enum, default_value_t = StaleArg::Prompt)]
        on_stale: StaleArg,

        /// Print the planned actions without touching any output directory
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Manage mappings and converter settings
    Config {
        /// Config action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    ///
    /// Outputs completion script for your shell.
    ///
    /// Examples:
    ///   mdexport completions bash > ~/.local/share/bash-completion/completions/mdexport
    ///   mdexport completions zsh > ~/.zfunc/_mdexport
    ///   mdexport completions fish > ~/.config/fish/completions/mdexport.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Add a mapping from an input folder to an output folder
    Add {
        /// Folder containing Markdown files
        input: PathBuf,
        /// Folder the PDFs and copies are written to
        output: PathBuf,
    },

    /// Remove the mapping for an input folder
    Remove {
        /// Input folder of the mapping
        input: PathBuf,
    },

    /// Show mappings and converter settings
    List,

    /// Configure the pandoc converter
    ///
    /// Examples:
    ///   mdexport config set-pandoc --path /usr/local/bin/pandoc
    ///   mdexport config set-pandoc -- --pdf-engine=xelatex -V geometry:margin=1in
    ///   mdexport config set-pandoc --clear-args
    SetPandoc(ConverterArgs),

    /// Configure the typst converter
    SetTypst(ConverterArgs),

    /// Print the location of the settings file
    Path,
}

/// Executable and argument overrides for one converter
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConverterArgs {
    /// Path to the converter executable
    #[arg(long)]
    pub path: Option<String>,

    /// Remove all extra arguments
    #[arg(long)]
    pub clear_args: bool,

    /// Extra arguments placed before the input and output files
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterArg {
    Pandoc,
    Typst,
}

impl From<ConverterArg> for ConverterKind {
    fn from(arg: ConverterArg) -> Self {
        match arg {
            ConverterArg::Pandoc => ConverterKind::Pandoc,
            ConverterArg::Typst => ConverterKind::Typst,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleArg {
    /// Ask for each file
    Prompt,
    /// Delete every stale file
    Delete,
    /// Keep every stale file
    Skip,
}

impl From<StaleArg> for StalePolicy {
    fn from(arg: StaleArg) -> Self {
        match arg {
            StaleArg::Prompt => StalePolicy::Prompt,
            StaleArg::Delete => StalePolicy::DeleteAll,
            StaleArg::Skip => StalePolicy::SkipAll,
        }
    }
}
