use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bey_stats::api::{self, state::AppState};
use bey_stats::calculate;
use bey_stats::config::AppConfig;
use bey_stats::models::{DerivedStats, PartSlot, TournamentCategory};
use bey_stats::storage::{self, StorageConfig};

#[derive(Parser)]
#[command(name = "bey-stats")]
#[command(about = "Personal battle statistics for spinning-top tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./bey-stats.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full statistics for a player
    Stats {
        /// Player name as recorded in the match table
        #[arg(long)]
        player: String,

        /// Only count tournaments of this category (practice, casual, ranked)
        #[arg(long)]
        category: Option<TournamentCategory>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print per-combination statistics for a player
    Combos {
        #[arg(long)]
        player: String,

        #[arg(long)]
        category: Option<TournamentCategory>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print per-part statistics for a player
    Parts {
        #[arg(long)]
        player: String,

        /// Only list one slot (blade, ratchet, bit, lockchip, assist_blade)
        #[arg(long)]
        slot: Option<PartSlot>,

        /// Hide parts with fewer matches (defaults to the config value)
        #[arg(long)]
        min_matches: Option<u32>,

        #[arg(long)]
        category: Option<TournamentCategory>,

        #[arg(long)]
        pretty: bool,
    },

    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Check the data lake and report parse failures
    Validate,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn load_stats(
    config: &AppConfig,
    player: &str,
    category: Option<TournamentCategory>,
) -> Result<DerivedStats> {
    let storage = StorageConfig::new(config.data_dir.clone());
    let matches = storage::read_matches(&storage)
        .with_context(|| format!("Failed to read matches from {:?}", storage.matches_path()))?;
    let tables = storage::read_part_tables(&storage)
        .with_context(|| format!("Failed to read part tables from {:?}", storage.parts_dir()))?;

    tracing::info!(
        "Loaded {} match records; aggregating for {}",
        matches.len(),
        player
    );

    let options = config.stats.aggregate_options(category);
    let stats = calculate::aggregate(&matches, &tables, player, &options);
    if stats.is_empty() {
        tracing::warn!("No matches found for player {}", player);
    }
    Ok(stats)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);

    tracing::info!("Starting bey-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Stats {
            player,
            category,
            pretty,
        } => {
            let stats = load_stats(&config, &player, category)?;
            print_json(&stats, pretty)?;
        }
        Commands::Combos {
            player,
            category,
            pretty,
        } => {
            let stats = load_stats(&config, &player, category)?;
            print_json(&stats.combos, pretty)?;
        }
        Commands::Parts {
            player,
            slot,
            min_matches,
            category,
            pretty,
        } => {
            let stats = load_stats(&config, &player, category)?;
            let min_matches = min_matches.unwrap_or(config.stats.min_part_matches);
            print_json(&stats.part_listing(slot, min_matches), pretty)?;
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let state = AppState::from_config(&config);
            let app = api::build_router(state);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Serving stats on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Validate => {
            let storage = StorageConfig::new(config.data_dir.clone());
            let report = storage::validate(&storage)?;

            println!("Data directory: {}", storage.data_dir.display());
            let mut rejected = 0;
            for entry in &report {
                let status = if entry.exists { "" } else { " (missing)" };
                println!(
                    "  {:<22} {:>6} parsed  {:>4} rejected{}",
                    entry.entity.filename(),
                    entry.parsed,
                    entry.rejected(),
                    status
                );
                rejected += entry.rejected();
            }

            if rejected > 0 {
                tracing::warn!("{} lines failed to parse", rejected);
            } else {
                tracing::info!("All stored lines parsed");
            }
        }
    }

    Ok(())
}
