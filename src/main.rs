use anyhow::{Context, Result};
use argus::session::provider::{self, StdinOperator};
use argus::session::SessionStore;
use argus::{config, digest, extract, watch};
use clap::{Parser, Subcommand};
use thirtyfour::WebDriver;

#[derive(Parser, Debug)]
#[command(name = "argus")]
#[command(about = "Presence watcher and unread-conversation digest for Telegram Web")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(long, short)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect unread conversations and print a digest to stdout
    Digest,
    /// Probe one user's presence text and print it
    Status {
        /// Numeric user id
        user_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("argus=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    // Digest mode talks to the summarization service; a missing credential
    // must fail before the browser session is brought up at all.
    let api_key = if matches!(args.command, Some(Command::Digest)) {
        Some(
            std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY must be set to run digest mode")?,
        )
    } else {
        None
    };

    let store = SessionStore::new(config.session_file()?);
    let driver = provider::acquire(&config, &store, &StdinOperator).await?;

    let result = match args.command {
        None => watch::run(&config, &driver).await,
        Some(Command::Digest) => run_digest(&config, &driver, api_key.as_deref()).await,
        Some(Command::Status { user_id }) => run_status(&config, &driver, user_id).await,
    };

    if let Err(e) = driver.quit().await {
        tracing::warn!("Failed to close WebDriver session: {}", e);
    }

    result
}

async fn run_digest(
    config: &config::Config,
    driver: &WebDriver,
    api_key: Option<&str>,
) -> Result<()> {
    let api_key = api_key.context("Digest mode requires an API key")?;
    let batch = extract::collect_unread(driver, config).await?;
    if batch.is_empty() {
        println!("No unread conversations.");
        return Ok(());
    }
    let digest = digest::summarize(api_key, &config.digest.model, &batch).await?;
    println!("{digest}");
    Ok(())
}

async fn run_status(config: &config::Config, driver: &WebDriver, user_id: i64) -> Result<()> {
    let status = extract::user_status(driver, user_id, config.probe_timeout()).await?;
    println!("{status}");
    Ok(())
}
