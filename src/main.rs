//! bored: fetch random activity suggestions and keep a local history.
//!
//! ## Subcommands
//!
//! - `new`: fetch one activity (optionally filtered) and save it
//! - `list`: print the most recently saved activities, newest first

mod activity;
mod command;
mod config;
mod entity;
mod fetcher;
mod store;
mod transport;

use activity::ActivityFilter;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use command::{App, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bored")]
#[command(about = "Bored API command line program")]
#[command(version, arg_required_else_help = true)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and save a new activity
    New(NewArgs),

    /// List recent activities
    List {
        /// Number of activities to show
        #[arg(long, default_value_t = store::DEFAULT_LIST_LIMIT)]
        limit: i64,
    },
}

#[derive(Args)]
struct NewArgs {
    /// Filter by activity type
    #[arg(long = "type")]
    kind: Option<String>,

    /// Number of participants
    #[arg(long)]
    participants: Option<i64>,

    /// Minimum price
    #[arg(long = "price_min")]
    price_min: Option<f64>,

    /// Maximum price
    #[arg(long = "price_max")]
    price_max: Option<f64>,

    /// Minimum accessibility
    #[arg(long = "accessibility_min")]
    accessibility_min: Option<f64>,

    /// Maximum accessibility
    #[arg(long = "accessibility_max")]
    accessibility_max: Option<f64>,

    /// Fetch a specific activity by its key
    #[arg(long)]
    key: Option<String>,
}

impl From<NewArgs> for ActivityFilter {
    fn from(args: NewArgs) -> Self {
        Self {
            kind: args.kind,
            participants: args.participants,
            price_min: args.price_min,
            price_max: args.price_max,
            accessibility_min: args.accessibility_min,
            accessibility_max: args.accessibility_max,
            key: args.key,
        }
    }
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::New(args) => Command::Fetch(args.into()),
            Commands::List { limit } => Command::List { limit },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    let store = store::ActivityStore::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open activity store: {}",
            config.database_path.display()
        )
    })?;
    tracing::debug!("Using activity store at {}", store.path().display());

    let transport = Arc::new(transport::HttpTransport::new());
    let fetcher = fetcher::ActivityFetcher::new(transport, config.api_url);
    let app = App::new(fetcher, store);

    let mut stdout = std::io::stdout().lock();
    app.execute(cli.command.into(), &mut stdout).await
}
