//! atrium - room-booking service cluster.
//!
//! Main entry point: parses the CLI, loads the cluster config, and
//! runs the selected services.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::net::TcpListener;
use tracing::info;

use atrium_server::{
    ActivityService, ClusterConfig, ReservationService, RoomService, Service, serve,
};
use atrium_store::JsonFileStore;
use atrium_wire::WireClient;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// atrium - room-booking service cluster
#[derive(Parser)]
#[command(name = "atrium")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the service cluster
    Start(StartArgs),

    /// Print the resolved cluster configuration
    Config(ConfigArgs),
}

/// Which service(s) to run in this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ServiceSelect {
    Room,
    Activity,
    Reservation,
    All,
}

impl ServiceSelect {
    fn includes(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to the cluster config file (overrides ATRIUM_CONFIG and ./atrium.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Service to run; the default runs all three in one process
    #[arg(long, value_enum, default_value_t = ServiceSelect::All)]
    pub service: ServiceSelect,

    /// Data directory (overrides config)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to the cluster config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Start(args) => start(args).await,
        Commands::Config(args) => show_config(&args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::prelude::*;

    let filter = resolve_log_filter(
        verbose,
        std::env::var("ATRIUM_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Filter precedence: `ATRIUM_LOG`, then `RUST_LOG`, then a built-in
/// default tracking `--verbose`. Empty values count as unset.
fn resolve_log_filter(
    verbose: bool,
    atrium_log: Option<String>,
    rust_log: Option<String>,
) -> String {
    atrium_log
        .filter(|f| !f.is_empty())
        .or(rust_log.filter(|f| !f.is_empty()))
        .unwrap_or_else(|| {
            if verbose {
                "atrium=debug,info".to_string()
            } else {
                "atrium=info,warn".to_string()
            }
        })
}

async fn start(args: StartArgs) -> Result<()> {
    let mut config = ClusterConfig::load(args.config.as_deref())
        .context("failed to load cluster configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    info!(data_dir = %config.storage.data_dir.display(), "starting cluster");

    let mut tasks = Vec::new();

    if args.service.includes(ServiceSelect::Room) {
        let store = JsonFileStore::new(&config.storage.data_dir);
        let service: Arc<dyn Service> =
            Arc::new(RoomService::open(store).context("failed to open room store")?);
        tasks.push(spawn_service(&config.room.addr(), service).await?);
    }

    if args.service.includes(ServiceSelect::Activity) {
        let store = JsonFileStore::new(&config.storage.data_dir);
        let service: Arc<dyn Service> =
            Arc::new(ActivityService::open(store).context("failed to open activity store")?);
        tasks.push(spawn_service(&config.activity.addr(), service).await?);
    }

    if args.service.includes(ServiceSelect::Reservation) {
        let store = JsonFileStore::new(&config.storage.data_dir);
        let service: Arc<dyn Service> = Arc::new(
            ReservationService::open(
                store,
                WireClient::new(),
                config.room.addr(),
                config.activity.addr(),
            )
            .context("failed to open reservation store")?,
        );
        tasks.push(spawn_service(&config.reservation.addr(), service).await?);
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutting down");
    for task in tasks {
        task.abort();
    }
    Ok(())
}

async fn spawn_service(
    addr: &str,
    service: Arc<dyn Service>,
) -> Result<tokio::task::JoinHandle<std::io::Result<()>>> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {} on {addr}", service.name()))?;
    Ok(tokio::spawn(serve(listener, service)))
}

fn show_config(args: &ConfigArgs) -> Result<()> {
    let config = ClusterConfig::load(args.config.as_deref())
        .context("failed to load cluster configuration")?;
    let rendered = config
        .to_toml()
        .context("failed to render cluster configuration")?;
    print!("{rendered}");
    Ok(())
}
