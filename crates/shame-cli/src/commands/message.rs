//! Message generation commands.

use chrono::Utc;
use clap::Subcommand;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use shame_core::{
    generate_creative_excuse, generate_positive_message, generate_shame_message, ShameLevel,
};

use super::{load_activities, load_tasks};

fn make_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    }
}

#[derive(Subcommand)]
pub enum MessageAction {
    /// Generate a shame message for a given score
    Shame {
        /// Procrastination score, 0-100
        score: u8,
        /// JSON file with an array of activities for context
        #[arg(long)]
        activities: Option<String>,
        /// JSON file with an array of tasks for context
        #[arg(long)]
        tasks: Option<String>,
        /// Context switch count
        #[arg(long, default_value = "0")]
        switches: u32,
        /// Seed the random template choice for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a positive reinforcement message
    Positive {
        /// Context to append, e.g. the completed task title
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a creative excuse
    Excuse {
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: MessageAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    match action {
        MessageAction::Shame {
            score,
            activities,
            tasks,
            switches,
            seed,
        } => {
            let score = score.min(100);
            let activities = activities.map(|p| load_activities(&p)).transpose()?;
            let tasks = tasks.map(|p| load_tasks(&p)).transpose()?;
            let mut rng = make_rng(seed);
            let message = generate_shame_message(
                &mut rng,
                score,
                ShameLevel::from_score(score),
                tasks.as_deref().unwrap_or(&[]),
                activities.as_deref().unwrap_or(&[]),
                switches,
                now,
            );
            println!("{} {}", message.emoji, message.message);
        }
        MessageAction::Positive { context, seed } => {
            let mut rng = make_rng(seed);
            let message = generate_positive_message(&mut rng, context.as_deref(), now);
            println!("{}", message.message);
        }
        MessageAction::Excuse { seed } => {
            let mut rng = make_rng(seed);
            println!("{}", generate_creative_excuse(&mut rng));
        }
    }
    Ok(())
}
