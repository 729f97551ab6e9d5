// Configuration loading and parsing (engine.toml).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use careerarc_core::tables::{AgingProfile, LevelTranslation, TableError};
use careerarc_core::{Level, Position, ProjectionEngine, ReferenceTables, Tuning};
use chrono::Datelike;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("invalid reference tables: {0}")]
    Tables(#[from] TableError),

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Last completed season.
    pub season: i32,
    pub data_paths: DataPaths,
    /// Players fetched concurrently per leaderboard batch.
    pub batch_size: usize,
    pub tables: Arc<ReferenceTables>,
    pub tuning: Arc<Tuning>,
}

impl Config {
    /// Build a projection engine sharing this config's tables and tuning.
    pub fn engine(&self) -> ProjectionEngine {
        ProjectionEngine::new(Arc::clone(&self.tables), Arc::clone(&self.tuning), self.season)
    }
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire engine.toml file.
#[derive(Debug, Clone, Deserialize)]
struct EngineFile {
    #[serde(default)]
    engine: EngineSection,
    data: DataPaths,
    leaderboard: LeaderboardSection,
    #[serde(default)]
    tuning: Tuning,
    #[serde(default)]
    tables: TableOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EngineSection {
    season: Option<i32>,
    horizon: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct LeaderboardSection {
    batch_size: usize,
}

/// CSV inputs. Prior files are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
    pub seasons: String,
    #[serde(default)]
    pub future_values: Option<String>,
    #[serde(default)]
    pub batted_ball: Option<String>,
}

/// Whole-entry replacements for the reference tables, keyed by level code
/// (`AA`, `MLB`, ...) and position code (`SS`, `CF`, ... or `DEFAULT`).
#[derive(Debug, Clone, Default, Deserialize)]
struct TableOverrides {
    #[serde(default)]
    levels: HashMap<String, LevelTranslation>,
    #[serde(default)]
    aging: HashMap<String, AgingProfile>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/engine.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let engine_path = base_dir.join("config").join("engine.toml");
    let text = read_file(&engine_path)?;
    let file: EngineFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: engine_path.clone(),
        source: e,
    })?;

    let mut tuning = file.tuning;
    if let Some(horizon) = file.engine.horizon {
        tuning.aging.horizon = horizon;
    }

    let season = file.engine.season.unwrap_or_else(default_season);
    let tables = build_tables(&file.tables)?;

    let config = Config {
        season,
        data_paths: file.data,
        batch_size: file.leaderboard.batch_size,
        tables: Arc::new(tables),
        tuning: Arc::new(tuning),
    };

    validate(&config)?;
    info!(
        "engine configured for season {} ({} season horizon)",
        config.season, config.tuning.aging.horizon
    );

    Ok(config)
}

/// Engine config files seeded from `defaults/` on first run.
const DEFAULT_FILES: &[&str] = &["engine.toml"];

/// Seed `config/` from `defaults/` for each engine config file not present
/// yet. Returns the files that were written.
///
/// A file already in `config/` is never touched, and `defaults/` is only
/// needed for files that are missing.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let mut seeded = Vec::new();
    for name in DEFAULT_FILES {
        let target = config_dir.join(name);
        if target.is_file() {
            debug!("using existing {}", target.display());
            continue;
        }
        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(copy_error(format!(
                "{} is missing and {} does not exist; run from the crate root",
                target.display(),
                source.display()
            )));
        }
        if seed_file(&source, &target)? {
            info!("seeded {} from {}", target.display(), source.display());
            seeded.push(target);
        }
    }

    Ok(seeded)
}

/// Copy `source` to a new file at `target`. Returns `false` if `target`
/// already exists.
fn seed_file(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| copy_error(format!("failed to create {}: {e}", dir.display())))?;
    }
    let mut dest = match std::fs::OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error(format!("failed to create {}: {e}", target.display()))),
    };
    let mut src = std::fs::File::open(source)
        .map_err(|e| copy_error(format!("failed to read {}: {e}", source.display())))?;
    std::io::copy(&mut src, &mut dest)
        .map_err(|e| copy_error(format!("failed to write {}: {e}", target.display())))?;
    Ok(true)
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// The previous calendar year: the last season known to be complete.
fn default_season() -> i32 {
    chrono::Local::now().year() - 1
}

/// Standard tables with config overrides applied, validated.
fn build_tables(overrides: &TableOverrides) -> Result<ReferenceTables, ConfigError> {
    let mut tables = ReferenceTables::standard();

    for (code, entry) in &overrides.levels {
        let level = Level::from_code(code).ok_or_else(|| ConfigError::ValidationError {
            field: format!("tables.levels.{code}"),
            message: format!("unknown level code '{code}'"),
        })?;
        debug!("overriding translation for {}", level);
        tables.set_translation(level, *entry);
    }

    for (code, profile) in &overrides.aging {
        if code.eq_ignore_ascii_case("default") {
            tables.set_default_aging_profile(*profile);
            continue;
        }
        let position = Position::from_code(code).ok_or_else(|| ConfigError::ValidationError {
            field: format!("tables.aging.{code}"),
            message: format!("unknown position code '{code}'"),
        })?;
        debug!("overriding aging profile for {}", position);
        tables.set_aging_profile(position, *profile);
    }

    tables.validate()?;
    Ok(tables)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.batch_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "leaderboard.batch_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    let tuning = &config.tuning;
    if tuning.aging.horizon == 0 {
        return Err(ConfigError::ValidationError {
            field: "engine.horizon".into(),
            message: "must be greater than 0".into(),
        });
    }

    if tuning.recency.max_seasons == 0 {
        return Err(ConfigError::ValidationError {
            field: "tuning.recency.max_seasons".into(),
            message: "must be greater than 0".into(),
        });
    }

    if let Some(w) = tuning.recency.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ConfigError::ValidationError {
            field: "tuning.recency.weights".into(),
            message: format!("weights must be finite and >= 0, got {w}"),
        });
    }

    let positive_fields: &[(&str, f64)] = &[
        ("tuning.blend.league_ops", tuning.blend.league_ops),
        ("tuning.blend.full_reliability_pa", tuning.blend.full_reliability_pa),
        ("tuning.war.full_season_pa", tuning.war.full_season_pa),
        ("tuning.war.runs_per_win", tuning.war.runs_per_win),
    ];
    for (name, val) in positive_fields {
        if val.is_nan() || *val <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be > 0, got {val}"),
            });
        }
    }

    if tuning.blend.ops_min > tuning.blend.ops_max {
        return Err(ConfigError::ValidationError {
            field: "tuning.blend.ops_min".into(),
            message: format!(
                "must not exceed ops_max ({} > {})",
                tuning.blend.ops_min, tuning.blend.ops_max
            ),
        });
    }

    if tuning.blend.rci_min > tuning.blend.rci_max {
        return Err(ConfigError::ValidationError {
            field: "tuning.blend.rci_min".into(),
            message: format!(
                "must not exceed rci_max ({} > {})",
                tuning.blend.rci_min, tuning.blend.rci_max
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
