//! Score calculation commands operating on JSON fixture files.

use chrono::Utc;
use clap::Subcommand;
use shame_core::{generate_report, EngineConfig, ReportPeriod, ScoreEngine};

use super::{load_activities, load_tasks};

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Calculate a one-shot score from fixture files
    Calculate {
        /// JSON file with an array of activities
        #[arg(long)]
        activities: Option<String>,
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: Option<String>,
        /// Context switch count for the current window
        #[arg(long, default_value = "0")]
        switches: u32,
        /// Emit the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a productivity report from fixture files
    Report {
        /// JSON file with an array of activities
        #[arg(long)]
        activities: Option<String>,
        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: Option<String>,
    },
}

pub fn run(action: ScoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    match action {
        ScoreAction::Calculate {
            activities,
            tasks,
            switches,
            json,
        } => {
            let activities = activities.map(|p| load_activities(&p)).transpose()?;
            let tasks = tasks.map(|p| load_tasks(&p)).transpose()?;
            let config = EngineConfig::load_or_default();

            let mut engine = ScoreEngine::with_weights(config.weights);
            let snapshot = engine.calculate(
                activities.as_deref().unwrap_or(&[]),
                tasks.as_deref().unwrap_or(&[]),
                switches,
                now,
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!(
                    "{} {} (level {})",
                    snapshot.level.emoji(),
                    snapshot.summary,
                    snapshot.level.as_u8()
                );
            }
        }
        ScoreAction::Report { activities, tasks } => {
            let activities = activities.map(|p| load_activities(&p)).transpose()?;
            let tasks = tasks.map(|p| load_tasks(&p)).transpose()?;
            let report = generate_report(
                activities.as_deref().unwrap_or(&[]),
                tasks.as_deref().unwrap_or(&[]),
                &[],
                ReportPeriod::Daily,
                now,
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
