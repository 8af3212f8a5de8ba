use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app_config;
mod commands;
mod common;
mod console;
mod webhook;

#[derive(Parser)]
#[command(name = "daykeeper-cli", version, about = "Daykeeper CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure day anchor, journal destination, and habits
    Setup(commands::setup::SetupArgs),
    /// Show today's schedule
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Run the daily habit check-in
    Checkin,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Setup(args) => commands::setup::run(args).await,
        Commands::Schedule { action } => commands::schedule::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Checkin => commands::checkin::run().await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
