//! Disable guard commands.

use chrono::Utc;
use clap::Subcommand;
use shame_core::{DisableGuard, EngineConfig};

use super::load_tasks;

#[derive(Subcommand)]
pub enum GuardAction {
    /// Check whether the engine could be disabled right now
    Check {
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: Option<String>,
    },
    /// Attempt to disable the engine (the attempt is logged)
    Attempt {
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: Option<String>,
        /// Stated reason for disabling
        #[arg(long)]
        reason: Option<String>,
    },
}

pub fn run(action: GuardAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let config = EngineConfig::load_or_default();
    let mut guard = DisableGuard::new();

    match action {
        GuardAction::Check { tasks } => {
            let tasks = tasks.map(|p| load_tasks(&p)).transpose()?;
            let state = guard.state(&config.schedule, tasks.as_deref().unwrap_or(&[]), now);
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        GuardAction::Attempt { tasks, reason } => {
            let tasks = tasks.map(|p| load_tasks(&p)).transpose()?;
            let verdict = guard.attempt_disable(
                &config.schedule,
                tasks.as_deref().unwrap_or(&[]),
                reason,
                now,
            );
            println!("{}", verdict.message);
            if !verdict.allowed {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
