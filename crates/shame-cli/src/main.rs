use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shame-cli", version, about = "Procrastination Shame Engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activity classification
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Score calculation and reports
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Message generation
    Message {
        #[command(subcommand)]
        action: commands::message::MessageAction,
    },
    /// Disable guard checks
    Guard {
        #[command(subcommand)]
        action: commands::guard::GuardAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Score { action } => commands::score::run(action),
        Commands::Message { action } => commands::message::run(action),
        Commands::Guard { action } => commands::guard::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
