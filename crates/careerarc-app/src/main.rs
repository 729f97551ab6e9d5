// careerarc entry point.
//
// Startup sequence:
// 1. Initialize tracing (appends to logs/careerarc.log; stdout carries the JSON output)
// 2. Load config
// 3. Load player data
// 4. Project one player (`careerarc <player-id>`) or the whole leaderboard
// 5. Print the result as JSON

use careerarc_app::config;
use careerarc_app::data;
use careerarc_app::leaderboard::{self, InMemorySource, SeasonSource};

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    let log_path = init_tracing()?;
    info!("careerarc starting up, logging to {}", log_path.display());

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    let engine = config.engine();

    // 3. Load player data
    let dataset = data::load_all(&config).context("failed to load player data")?;
    let source = InMemorySource::new(dataset.seasons);

    // 4-5. Project and print
    let output = match std::env::args().nth(1) {
        Some(arg) => {
            let id: u64 = arg
                .parse()
                .with_context(|| format!("invalid player id '{arg}'"))?;
            let player = dataset
                .players
                .iter()
                .find(|p| p.id == id)
                .with_context(|| format!("player {id} not found in catalog"))?;
            let records = source
                .seasons(id)
                .await
                .with_context(|| format!("failed to fetch seasons for player {id}"))?;
            let report = leaderboard::build_report(&engine, player, &records, &dataset.priors)
                .with_context(|| format!("not enough data to project player {id}"))?;
            info!("projected {} ({})", player.name, id);
            serde_json::to_string_pretty(&report)?
        }
        None => {
            let rows = leaderboard::run_leaderboard(
                &engine,
                &dataset.players,
                &source,
                &dataset.priors,
                config.batch_size,
            )
            .await;
            serde_json::to_string_pretty(&rows)?
        }
    };

    println!("{output}");
    info!("careerarc finished");
    Ok(())
}

/// Log file under the working directory; runs append to it.
const LOG_FILE: &str = "logs/careerarc.log";

/// Used when `RUST_LOG` is unset. The binary and both library crates log
/// at info, everything else at warn.
const DEFAULT_LOG_FILTER: &str = "careerarc=info,careerarc_app=info,careerarc_core=info,warn";

/// Send tracing output to [`LOG_FILE`]; stdout carries only the JSON result.
/// Returns the log file path.
fn init_tracing() -> anyhow::Result<std::path::PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let path = std::env::current_dir()?.join(LOG_FILE);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;
    Ok(path)
}
