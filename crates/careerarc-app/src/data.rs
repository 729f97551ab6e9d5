// Player data loading: catalog, season lines, and per-player priors.
//
// Reads plain CSV exports. Malformed rows are skipped with a warning rather
// than failing the whole file.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use careerarc_core::resolver::Resolver;
use careerarc_core::{BattedBallProfile, FutureValue, Level, Position, RateLine, SeasonRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Config, DataPaths};

/// Position code the catalog uses for pitchers.
pub const PITCHER_CODE: &str = "1";

/// Plausible player age band; catalog ages outside it are clamped.
pub const MIN_PLAYER_AGE: u32 = 16;
pub const MAX_PLAYER_AGE: u32 = 50;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub team: String,
    /// Position code exactly as it appeared in the catalog.
    pub position_code: String,
    /// Parsed hitting position; `None` for pitchers and unknown codes.
    pub position: Option<Position>,
    pub age: u32,
}

impl Player {
    pub fn is_pitcher(&self) -> bool {
        self.position_code.trim() == PITCHER_CODE
    }
}

/// Optional per-player priors, looked up by id then by name.
#[derive(Debug, Clone, Default)]
pub struct Priors {
    pub future_values: Resolver<FutureValue>,
    pub batted_ball: Resolver<BattedBallProfile>,
}

/// Everything loaded from the data directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub players: Vec<Player>,
    /// Season records keyed by player id, in file order.
    pub seasons: HashMap<u64, Vec<SeasonRecord>>,
    pub priors: Priors,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: u64,
    name: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    position: String,
    age: f64,
}

/// Season line. Counting stats are f64 so fractional or negative values in
/// messy exports parse and can be cleaned up here.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawSeason {
    player_id: u64,
    season: i32,
    level: String,
    PA: f64,
    #[serde(default)]
    HR: f64,
    #[serde(default)]
    SB: f64,
    AVG: f64,
    OBP: f64,
    SLG: f64,
    #[serde(default)]
    OPS: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFutureValue {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    fv: f64,
}

#[derive(Debug, Deserialize)]
struct RawBattedBall {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    avg_ev: f64,
    max_ev: f64,
    barrel_pct: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Round a counting stat, clamping negatives to zero.
fn count(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

/// Level code ("AA") or upstream sport id ("12").
fn parse_level(s: &str) -> Option<Level> {
    Level::from_code(s).or_else(|| s.trim().parse().ok().and_then(Level::from_sport_id))
}

fn season_from_raw(raw: RawSeason) -> Option<SeasonRecord> {
    if !all_finite(&[raw.PA, raw.AVG, raw.OBP, raw.SLG]) {
        warn!(
            "skipping {} season for player {}: non-finite PA/AVG/OBP/SLG",
            raw.season, raw.player_id
        );
        return None;
    }
    if raw.PA < 0.0 {
        warn!(
            "player {} {} season has negative PA ({}), treating as 0",
            raw.player_id, raw.season, raw.PA
        );
    }
    let level = match parse_level(&raw.level) {
        Some(level) => level,
        None => {
            warn!(
                "player {} {} season has unknown level '{}', treating as MLB",
                raw.player_id, raw.season, raw.level
            );
            Level::Mlb
        }
    };
    let ops = match raw.OPS {
        Some(ops) if ops.is_finite() => ops,
        _ => raw.OBP + raw.SLG,
    };
    Some(SeasonRecord {
        season: raw.season,
        level,
        pa: count(raw.PA),
        hr: count(raw.HR),
        sb: count(raw.SB),
        rates: RateLine {
            obp: raw.OBP,
            slg: raw.SLG,
            ops,
            avg: raw.AVG,
        },
    })
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                if !raw.age.is_finite() || raw.age < 0.0 {
                    warn!("skipping player '{}': invalid age {}", raw.name.trim(), raw.age);
                    continue;
                }
                let rounded = raw.age.round();
                let age = rounded.clamp(MIN_PLAYER_AGE as f64, MAX_PLAYER_AGE as f64) as u32;
                if age as f64 != rounded {
                    warn!(
                        "player '{}': age {} clamped to {}",
                        raw.name.trim(),
                        raw.age,
                        age
                    );
                }
                let position_code = raw.position.trim().to_string();
                players.push(Player {
                    id: raw.id,
                    name: raw.name.trim().to_string(),
                    team: raw.team.trim().to_string(),
                    position: Position::from_code(&position_code),
                    position_code,
                    age,
                });
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

fn load_seasons_from_reader<R: Read>(rdr: R) -> Result<HashMap<u64, Vec<SeasonRecord>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut seasons: HashMap<u64, Vec<SeasonRecord>> = HashMap::new();
    for result in reader.deserialize::<RawSeason>() {
        match result {
            Ok(raw) => {
                let player_id = raw.player_id;
                if let Some(record) = season_from_raw(raw) {
                    seasons.entry(player_id).or_default().push(record);
                }
            }
            Err(e) => {
                warn!("skipping malformed season row: {}", e);
            }
        }
    }
    Ok(seasons)
}

fn load_future_values_from_reader<R: Read>(rdr: R) -> Result<Resolver<FutureValue>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut resolver = Resolver::new();
    for result in reader.deserialize::<RawFutureValue>() {
        match result {
            Ok(raw) => {
                if !raw.fv.is_finite() {
                    warn!("skipping future value for '{}': non-finite grade", raw.name.trim());
                    continue;
                }
                let fv = FutureValue::new(raw.fv.round() as i32);
                if let Some(id) = raw.id {
                    if resolver.insert_id(id, fv).is_some() {
                        warn!("duplicate future value for id {}, using latest value", id);
                    }
                }
                if resolver.insert_name(&raw.name, fv).is_some() {
                    warn!("duplicate future value for '{}', using latest value", raw.name.trim());
                }
            }
            Err(e) => {
                warn!("skipping malformed future value row: {}", e);
            }
        }
    }
    Ok(resolver)
}

fn load_batted_ball_from_reader<R: Read>(rdr: R) -> Result<Resolver<BattedBallProfile>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut resolver = Resolver::new();
    for result in reader.deserialize::<RawBattedBall>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[raw.avg_ev, raw.max_ev, raw.barrel_pct]) {
                    warn!("skipping batted-ball profile for '{}': non-finite value", raw.name.trim());
                    continue;
                }
                let profile = BattedBallProfile {
                    avg_ev: raw.avg_ev,
                    max_ev: raw.max_ev,
                    barrel_pct: raw.barrel_pct,
                };
                if let Some(id) = raw.id {
                    resolver.insert_id(id, profile);
                }
                resolver.insert_name(&raw.name, profile);
            }
            Err(e) => {
                warn!("skipping malformed batted-ball row: {}", e);
            }
        }
    }
    Ok(resolver)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> DataError + '_ {
    move |e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

/// Load the player catalog from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, DataError> {
    load_players_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load season lines from a CSV file, grouped by player id.
pub fn load_seasons(path: &Path) -> Result<HashMap<u64, Vec<SeasonRecord>>, DataError> {
    load_seasons_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load future-value grades from a CSV file.
pub fn load_future_values(path: &Path) -> Result<Resolver<FutureValue>, DataError> {
    load_future_values_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load batted-ball profiles from a CSV file.
pub fn load_batted_ball(path: &Path) -> Result<Resolver<BattedBallProfile>, DataError> {
    load_batted_ball_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load everything using paths from the config.
pub fn load_all(config: &Config) -> Result<Dataset, DataError> {
    load_all_from_paths(&config.data_paths)
}

/// Load everything from explicit paths. Exposed for testing and flexibility.
pub fn load_all_from_paths(paths: &DataPaths) -> Result<Dataset, DataError> {
    let players = load_players(Path::new(&paths.players))?;
    let seasons = load_seasons(Path::new(&paths.seasons))?;

    if players.is_empty() {
        return Err(DataError::Validation("player CSV produced zero valid rows".into()));
    }

    let future_values = match &paths.future_values {
        Some(p) => load_future_values(Path::new(p))?,
        None => Resolver::new(),
    };
    let batted_ball = match &paths.batted_ball {
        Some(p) => load_batted_ball(Path::new(p))?,
        None => Resolver::new(),
    };

    info!(
        "loaded {} players, season lines for {} players, {} FV entries, {} batted-ball entries",
        players.len(),
        seasons.len(),
        future_values.len(),
        batted_ball.len()
    );

    Ok(Dataset {
        players,
        seasons,
        priors: Priors {
            future_values,
            batted_ball,
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
