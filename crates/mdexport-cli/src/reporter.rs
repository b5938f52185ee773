//! Colored progress output for sync runs

use colored::Colorize;
use mdexport_core::sync::{EventSink, OutcomeStatus, Resolution, SyncEvent, SyncOutcome, TransferKind};

/// Prints one line per processed file and a summary per mapping.
#[derive(Debug, Default)]
pub struct Reporter;

impl EventSink for Reporter {
    fn on_event(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::MappingStarted { source, target } => {
                println!(
                    "{} Syncing {} -> {}",
                    "=>".blue().bold(),
                    source.display().to_string().cyan(),
                    target.display().to_string().cyan()
                );
            }
            SyncEvent::FileProcessed {
                relative_path,
                target_path,
                kind,
                outcome,
            } => match (kind, outcome) {
                (TransferKind::Convert, Ok(())) => {
                    println!("   {} {} -> {}", "converted".green(), relative_path, target_path);
                }
                (TransferKind::Copy, Ok(())) => {
                    println!("   {} {}", "copied".green(), relative_path);
                }
                (_, Err(message)) => {
                    println!("   {} {}: {}", "failed".red().bold(), relative_path, message);
                }
            },
            SyncEvent::StaleFilePrompt { .. } => {}
            SyncEvent::StaleFileResolved {
                relative_path,
                resolution,
            } => match resolution {
                Resolution::Deleted => println!("   {} {}", "deleted".yellow(), relative_path),
                Resolution::Skipped { .. } => {
                    println!("   {} {}", "skipped".dimmed(), relative_path)
                }
                Resolution::Failed { message } => {
                    println!("   {} {}: {}", "failed".red().bold(), relative_path, message)
                }
            },
            SyncEvent::MappingFinished { outcome } => print_summary(outcome),
        }
    }
}

fn print_summary(outcome: &SyncOutcome) {
    let label = match &outcome.status {
        OutcomeStatus::Aborted { reason } => {
            println!("{} {}", "ERROR".red().bold(), reason);
            return;
        }
        OutcomeStatus::Cancelled => "CANCELLED".yellow().bold(),
        OutcomeStatus::Completed if outcome.failed > 0 => "DONE".yellow().bold(),
        OutcomeStatus::Completed => "OK".green().bold(),
    };
    println!("{} {}", label, counts(outcome));
    println!();
}

/// `2 converted, 1 copied, ...` for one outcome.
pub fn counts(outcome: &SyncOutcome) -> String {
    format!(
        "{} converted, {} copied, {} deleted, {} skipped, {} failed",
        outcome.converted, outcome.copied, outcome.deleted, outcome.skipped, outcome.failed
    )
}
