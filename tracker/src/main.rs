use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracker::config::{self, ServerConfig};
use tracker::web;
use tracker::web::state::AppState;

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Demo delivery-pipeline tracker with simulated role agents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bind host
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configured Jira credentials
    ValidateJira,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // The env file can hold bind and credential settings, so it loads
    // before CLI parsing reads the environment.
    config::load_env_file();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ValidateJira) => validate_jira().await,
        None => {
            let state = AppState::from_env();
            let config = ServerConfig {
                host: cli.host,
                port: cli.port,
            };
            web::serve(config, state).await
        }
    }
}

async fn validate_jira() -> Result<()> {
    let client = collab::JiraClient::from_env()
        .ok_or_else(|| anyhow::anyhow!("Jira credentials are not configured"))?;
    let name = client.myself().await?;
    println!("Jira credentials valid for: {name}");
    Ok(())
}
