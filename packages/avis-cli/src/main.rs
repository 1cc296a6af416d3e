//! Terminal front end for the avis reputation service
//!
//! Every command goes through the core Orchestrator; this binary only
//! collects input and renders state.

use anyhow::{Context, Result};
use avis_core::{Config, FileSessionStorage, Orchestrator, ReputationService};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod render;

#[derive(Parser)]
#[command(name = "avis")]
#[command(about = "Look up and review client phone numbers")]
#[command(version)]
struct Cli {
    /// Reputation service base URL
    #[arg(long, env = "AVIS_API_URL", global = true)]
    api_url: Option<String>,

    /// Directory holding the saved session
    #[arg(long, env = "AVIS_SESSION_DIR", global = true)]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and save the session
    Login {
        /// Account email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Create an account
    Register {
        /// Account email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Sign in right after registering
        #[arg(long)]
        login: bool,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// List reviews for a client phone number
    Search {
        /// Phone number (6 to 15 digits)
        phone: String,
    },

    /// Add a review for a client phone number
    Review {
        /// Phone number (6 to 15 digits)
        phone: String,

        /// Record a negative experience (default is positive)
        #[arg(long)]
        negative: bool,

        /// Optional comment
        #[arg(short, long, default_value = "")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,avis_core=info,avis_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        render::print_error(&format!("{:#}", e));
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.api_url.as_deref() {
        Some(url) => Config::new(url)?,
        None => Config::from_env()?,
    };
    let session_dir = match cli.session_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|d| d.join("avis"))
            .context("Could not determine a data directory; pass --session-dir")?,
    };
    tracing::debug!(api_url = %config.api_url, session_dir = %session_dir.display(), "Starting");

    let app = Orchestrator::bootstrap(
        Arc::new(ReputationService::from_config(&config)),
        Arc::new(FileSessionStorage::new(session_dir)),
    );

    match cli.command {
        Some(Commands::Login { email }) => cmd::auth::login(&app, email).await,
        Some(Commands::Register { email, login }) => cmd::auth::register(&app, email, login).await,
        Some(Commands::Logout) => cmd::auth::logout(&app),
        Some(Commands::Whoami) => cmd::auth::whoami(&app),
        Some(Commands::Search { phone }) => cmd::reviews::search(&app, &phone).await,
        Some(Commands::Review {
            phone,
            negative,
            message,
        }) => {
            let draft = avis_core::NewReviewDraft {
                client_phone: phone,
                is_positive: !negative,
                message,
            };
            cmd::reviews::add(&app, draft).await
        }
        None => cmd::shell::run(&app).await,
    }
}
