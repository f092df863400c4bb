//! Activity classification commands.

use clap::Subcommand;
use shame_core::{classify, ActivityCategory};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Classify a URL, app name, or description
    Classify {
        /// The URL, app name, or free-text description
        input: String,
    },
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ActivityAction::Classify { input } => {
            let category = classify(&input);
            println!("{} -- {}", category.name(), category.label());
            if matches!(
                category,
                ActivityCategory::Questionable | ActivityCategory::BlatantProcrastination
            ) {
                println!("waste weight: {}", category.waste_weight());
            }
        }
    }
    Ok(())
}
