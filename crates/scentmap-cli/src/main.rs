mod curate;
mod places;
mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scentmap_core::AppConfig;
use scentmap_store::FirestoreClient;
use tracing_subscriber::EnvFilter;

use crate::places::PlacesCommands;

#[derive(Debug, Parser)]
#[command(name = "scentmap-cli")]
#[command(about = "Scent map catalog operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Query the catalog with the same filters the web map uses
    Places {
        #[command(subcommand)]
        command: PlacesCommands,
    },
    /// Validate the seed catalog and write every place to the store
    Seed {
        /// Seed file to load (defaults to `SCENTMAP_CATALOG_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Validate and list the places without writing to the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Turn a free-text description into validated catalog entries
    Convert {
        /// Text file holding the description
        #[arg(long)]
        input: PathBuf,
        /// Add the accepted entries to the store
        #[arg(long)]
        import: bool,
    },
    /// Generate enhanced descriptions and scent profiles
    Enhance {
        /// Enhance a single place and print the result (not persisted)
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        place_id: Option<String>,
        /// Enhance the whole catalog and write results back
        #[arg(long)]
        all: bool,
        /// With --all, only places that have no enhanced data yet
        #[arg(long, requires = "all")]
        only_failed: bool,
        /// With --all, count the places that would be processed and stop
        #[arg(long, requires = "all")]
        check_only: bool,
    },
}

fn load_config() -> anyhow::Result<AppConfig> {
    Ok(scentmap_core::load_app_config()?)
}

fn store_client(config: &AppConfig) -> anyhow::Result<FirestoreClient> {
    Ok(FirestoreClient::new(
        &config.firestore,
        config.http_timeout_secs,
    )?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = std::env::var("SCENTMAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Places { command }) => places::run_places(command).await?,
        Some(Commands::Seed { path, dry_run }) => {
            seed::run_seed(path.as_deref(), dry_run).await?;
        }
        Some(Commands::Convert { input, import }) => {
            curate::run_convert(&input, import).await?;
        }
        Some(Commands::Enhance {
            place_id,
            all,
            only_failed,
            check_only,
        }) => match place_id {
            Some(id) if !all => curate::run_enhance_one(&id).await?,
            _ => curate::run_enhance_all(only_failed, check_only).await?,
        },
        None => println!("scentmap-cli: run with --help to list commands"),
    }

    Ok(())
}
