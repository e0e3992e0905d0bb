use clap::Parser;
use interview_coach::config::Command;
use interview_coach::data::load_state;
use interview_coach::{Cli, Coach, CoachError, FileStore, logging, stats_report};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error running interview coach: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CoachError> {
    let cli = Cli::parse();
    let command = cli.command;
    let config = cli.into_config()?;

    if command == Some(Command::Stats) {
        let store = FileStore::new(&config.state_dir);
        print!("{}", stats_report(&load_state(&store, &config.state_key)));
        return Ok(());
    }

    let _log_guard = logging::init_tracing(&config.log_dir, &config.log_level)?;
    tracing::info!(
        backend = %config.backend_url,
        state_dir = %config.state_dir.display(),
        "starting interview coach"
    );

    Coach::from_config(&config).run().await
}
