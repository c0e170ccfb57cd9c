//! VolunteerHub client
//!
//! Command line entry point

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use volunteer_hub::{
    config::Settings,
    handlers::{self, Command},
    services::ServiceFactory,
    state::{FileStore, SessionStore},
    utils::logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::new()?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;
    info!(version = volunteer_hub::VERSION, api = %settings.api.base_url, "Starting VolunteerHub client");

    // The session lives in one place and is shared with every service
    let storage = FileStore::new(&settings.session.storage_path);
    let session = Arc::new(SessionStore::new(Box::new(storage)));
    let services = ServiceFactory::new(settings, session)?;

    match handlers::run(cli.command, &services).await {
        Ok(output) => {
            println!("{}", output.trim_end());
            Ok(())
        }
        Err(e) => {
            error!(error = %e, severity = %e.severity(), "Command failed");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}
