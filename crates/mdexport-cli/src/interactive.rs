//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based interactive selection.

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::Select;
use mdexport_core::sync::{Decision, DecisionSource};
use mdexport_core::{Error, StalePolicy};
use mdexport_fs::NormalizedPath;

/// Index of the default choice (skip this file)
const DEFAULT_CHOICE: usize = 1;

/// Asks on the terminal what to do with each stale file.
///
/// Escape or `q` cancels the whole run.
#[derive(Debug, Default)]
pub struct PromptDecisions;

impl DecisionSource for PromptDecisions {
    fn decide(&mut self, relative_path: &NormalizedPath) -> mdexport_core::Result<Decision> {
        let items: Vec<&str> = Decision::ALL.iter().map(|d| d.label()).collect();
        let choice = Select::new()
            .with_prompt(format!(
                "{} no longer exists in the input. What should happen to it?",
                relative_path.to_string().cyan()
            ))
            .items(&items)
            .default(DEFAULT_CHOICE)
            .interact_opt()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        match choice {
            Some(index) => Ok(Decision::ALL[index]),
            None => Err(Error::Cancelled),
        }
    }
}

/// The policy to run with, given what the user asked for.
///
/// Prompting needs a terminal on stdin; without one every stale file is
/// kept.
pub fn effective_policy(requested: StalePolicy) -> StalePolicy {
    effective_policy_for(requested, std::io::stdin().is_terminal())
}

fn effective_policy_for(requested: StalePolicy, interactive: bool) -> StalePolicy {
    if requested == StalePolicy::Prompt && !interactive {
        tracing::warn!("stdin is not a terminal; keeping all stale files");
        return StalePolicy::SkipAll;
    }
    requested
}
