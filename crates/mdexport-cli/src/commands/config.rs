//! Config command implementations
//!
//! Manage the mappings and converter settings stored in the settings file.

use std::path::{Path, PathBuf};

use colored::Colorize;

use mdexport_core::{ConverterKind, ExportConfig};

use crate::cli::ConverterArgs;
use crate::error::{CliError, Result};

/// The settings file to use: `explicit` if given, otherwise the platform default.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(ExportConfig::default_path()?),
    }
}

/// Run the config add command
///
/// The input folder must exist and differ from the output folder; both are
/// stored as absolute paths.
pub fn run_add(config_path: &Path, input: &Path, output: &Path) -> Result<()> {
    if !input.is_dir() {
        return Err(CliError::user(format!(
            "Input folder does not exist or is not a directory: {}",
            input.display()
        )));
    }
    let input = dunce::canonicalize(input)?;
    let output = match dunce::canonicalize(output) {
        Ok(existing) => existing,
        Err(_) => std::path::absolute(output)?,
    };
    if input == output {
        return Err(CliError::user(format!(
            "Output folder must differ from the input folder: {}",
            input.display()
        )));
    }

    let mut config = ExportConfig::load_or_init(config_path)?;
    let replaced = config.add_mapping(&input.display().to_string(), &output.display().to_string());
    config.save(config_path)?;

    let verb = if replaced { "Updated" } else { "Added" };
    println!(
        "{} {} mapping {} -> {}",
        "OK".green().bold(),
        verb,
        input.display().to_string().cyan(),
        output.display().to_string().cyan()
    );
    Ok(())
}

/// Run the config remove command
pub fn run_remove(config_path: &Path, input: &Path) -> Result<()> {
    let mut config = ExportConfig::load_or_init(config_path)?;

    let mut candidates = vec![input.display().to_string()];
    if let Ok(canonical) = dunce::canonicalize(input) {
        candidates.push(canonical.display().to_string());
    }
    if let Ok(absolute) = std::path::absolute(input) {
        candidates.push(absolute.display().to_string());
    }

    let removed = candidates.iter().any(|c| config.remove_mapping(c));
    if removed {
        config.save(config_path)?;
        println!(
            "{} Removed mapping for {}",
            "OK".green().bold(),
            input.display().to_string().cyan()
        );
    } else {
        println!(
            "{} No mapping found for {}",
            "WARN".yellow().bold(),
            input.display().to_string().cyan()
        );
    }
    Ok(())
}

/// Run the config list command
pub fn run_list(config_path: &Path) -> Result<()> {
    let config = ExportConfig::load_or_init(config_path)?;

    println!("{}", "Mappings:".bold());
    if config.mappings.is_empty() {
        println!("   {}", "(none)".dimmed());
    }
    for (i, mapping) in config.mappings.iter().enumerate() {
        println!(
            "   {}. {} -> {}",
            i + 1,
            mapping.source.cyan(),
            mapping.target.cyan()
        );
    }
    println!();

    println!(
        "{} {}",
        "Default converter:".bold(),
        config.sync.converter.to_string().cyan()
    );
    println!("{} {}s", "Timeout:".bold(), config.sync.timeout_secs);
    for kind in [ConverterKind::Pandoc, ConverterKind::Typst] {
        print_converter(&config, kind);
    }
    Ok(())
}

fn print_converter(config: &ExportConfig, kind: ConverterKind) {
    let settings = config.settings(kind);
    println!();
    println!("{}", format!("{}:", kind.display_name()).bold());
    match &settings.path {
        Some(path) => println!("   path: {}", path.cyan()),
        None => println!(
            "   path: {}",
            format!("not set (using default \"{}\")", kind.default_executable()).dimmed()
        ),
    }
    if settings.args.is_empty() {
        println!("   args: {}", "none".dimmed());
    } else {
        println!("   args: {}", settings.args.join(" ").cyan());
    }
}

/// Run the config set-pandoc / set-typst commands
pub fn run_set_converter(config_path: &Path, kind: ConverterKind, args: ConverterArgs) -> Result<()> {
    if args.path.is_none() && !args.clear_args && args.args.is_empty() {
        return Err(CliError::user(format!(
            "Nothing to change. Pass --path, --clear-args, or arguments after `--`, e.g. `mdexport config set-{kind} -- --toc`"
        )));
    }

    let new_args = if !args.args.is_empty() {
        Some(args.args)
    } else if args.clear_args {
        Some(Vec::new())
    } else {
        None
    };

    let mut config = ExportConfig::load_or_init(config_path)?;
    config.set_converter(kind, args.path, new_args)?;
    config.save(config_path)?;

    println!(
        "{} Updated {} settings",
        "OK".green().bold(),
        kind.display_name()
    );
    print_converter(&config, kind);
    Ok(())
}

/// Run the config path command
pub fn run_path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}
