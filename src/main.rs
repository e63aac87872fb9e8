#![allow(clippy::result_large_err)]

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use finance_tracker::{
    cli::{self, AppContext, Session, console::Console, maintenance},
    config::{
        database,
        settings::{self, DEFAULT_SETTINGS_PATH},
    },
    errors::Result,
};
use std::{io, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "finance-tracker",
    version,
    about = "Personal finance tracker: users, spending categories with budgets, and transactions"
)]
struct Cli {
    /// Database URL, e.g. sqlite://finance_tracker.sqlite?mode=rwc
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Path to the TOML settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Run,
    /// Create a demo user with categories and transactions
    SeedDemo,
    /// Show row counts and a summary of every user
    Inspect,
    /// Delete all users, categories and transactions
    Clean {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible); warn keeps the menu readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // 2. Load .env before parsing so DATABASE_URL can come from it
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    let args = Cli::parse();

    // 3. Load settings and resolve the database URL
    let settings = settings::load_settings_or_default(&args.config)
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    let database_url = settings.resolve_database_url(args.database_url.as_deref());

    // 4. Initialize database
    let db = database::init_database(&database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let ctx = AppContext::new(db, &settings);
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    // 5. Dispatch
    let outcome = match args.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let mut session = Session::default();
            cli::run(&ctx, &mut session, &mut console).await
        }
        Commands::SeedDemo => maintenance::seed_demo(&ctx, &mut console).await,
        Commands::Inspect => maintenance::inspect(&ctx, &mut console).await,
        Commands::Clean { yes } => maintenance::clean(&ctx, &mut console, yes).await,
    };
    outcome.inspect_err(|e| error!("{}", e))
}
