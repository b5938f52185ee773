//! Sync command implementation
//!
//! Loads the configured mappings and mirrors each of them, or prints the
//! plan when running dry.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use mdexport_core::sync::{Action, NullSink, OutcomeStatus, SyncOutcome};
use mdexport_core::{ConverterKind, ExportConfig, Mapping, ProcessConverter, StalePolicy, SyncEngine};

use crate::error::{CliError, Result};
use crate::interactive::{PromptDecisions, effective_policy};
use crate::reporter::{Reporter, counts};

/// Options for the sync command
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub converter: Option<ConverterKind>,
    pub on_stale: StalePolicy,
    pub dry_run: bool,
    pub json: bool,
}

/// Planned actions for one mapping, as printed by `--dry-run --json`
#[derive(Debug, Serialize)]
struct MappingPlan {
    source: PathBuf,
    target: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    actions: Option<Vec<Action>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the sync command
///
/// Exits with an error after the summary if any file failed or any mapping
/// could not be processed.
pub fn run_sync(config_path: &Path, options: SyncOptions) -> Result<()> {
    let config = ExportConfig::load_or_init(config_path)?;
    if config.mappings.is_empty() {
        println!(
            "{} No mappings configured. Add one with {}",
            "WARN".yellow().bold(),
            "mdexport config add <input> <output>".cyan()
        );
        return Ok(());
    }

    let mappings = config.resolve_mappings(options.converter)?;
    let converter = ProcessConverter::new(config.timeout())?;
    let engine = SyncEngine::new(Box::new(converter));

    if options.dry_run {
        return print_plan(&engine, &mappings, options.json);
    }

    let engine = engine.with_stale_policy(effective_policy(options.on_stale));
    let mut decisions = PromptDecisions;
    let outcomes = if options.json {
        engine.run_all(&mappings, &mut decisions, &mut NullSink)
    } else {
        engine.run_all(&mappings, &mut decisions, &mut Reporter)
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_total(&outcomes);
    }

    let failed: usize = outcomes.iter().map(|o| o.failed).sum();
    let aborted = outcomes
        .iter()
        .filter(|o| matches!(o.status, OutcomeStatus::Aborted { .. }))
        .count();
    if failed > 0 || aborted > 0 {
        return Err(CliError::user(format!(
            "sync finished with {failed} failed file(s) and {aborted} skipped mapping(s)"
        )));
    }
    Ok(())
}

fn print_plan(engine: &SyncEngine, mappings: &[Mapping], json: bool) -> Result<()> {
    let plans: Vec<MappingPlan> = mappings
        .iter()
        .map(|mapping| {
            let (actions, error) = match engine.plan(mapping) {
                Ok(actions) => (Some(actions), None),
                Err(e) => (None, Some(e.to_string())),
            };
            MappingPlan {
                source: mapping.source.clone(),
                target: mapping.target.clone(),
                actions,
                error,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for plan in &plans {
        println!(
            "{} {} -> {} {}",
            "=>".blue().bold(),
            plan.source.display().to_string().cyan(),
            plan.target.display().to_string().cyan(),
            "(dry run)".dimmed()
        );
        if let Some(error) = &plan.error {
            println!("   {} {}", "ERROR".red().bold(), error);
        }
        for action in plan.actions.iter().flatten() {
            match action {
                Action::Copy { relative_path, .. } => {
                    println!("   {} {}", "copy".green(), relative_path)
                }
                Action::Convert {
                    relative_path,
                    output_path,
                    ..
                } => println!("   {} {} -> {}", "convert".green(), relative_path, output_path),
                Action::StaleCandidate { relative_path, .. } => {
                    println!("   {} {}", "stale".yellow(), relative_path)
                }
            }
        }
        println!();
    }
    Ok(())
}

fn print_total(outcomes: &[SyncOutcome]) {
    let mut total = match outcomes.first() {
        Some(first) => first.clone(),
        None => return,
    };
    for outcome in &outcomes[1..] {
        total.converted += outcome.converted;
        total.copied += outcome.copied;
        total.deleted += outcome.deleted;
        total.skipped += outcome.skipped;
        total.failed += outcome.failed;
    }

    println!(
        "{} {} mapping(s): {}",
        "Total".bold(),
        outcomes.len(),
        counts(&total)
    );

    if total.failed == 0 {
        return;
    }
    println!();
    println!("{}", "Failed files:".red().bold());
    for outcome in outcomes.iter().filter(|o| !o.failures.is_empty()) {
        println!("   {}", outcome.source.display().to_string().cyan());
        for failure in &outcome.failures {
            println!(
                "   {} {} ({}): {}",
                "!".red(),
                failure.relative_path,
                failure.kind.to_string().dimmed(),
                failure.message
            );
        }
    }
}
