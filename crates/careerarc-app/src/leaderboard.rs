// Leaderboard runner: fetch season lines in fixed-size concurrent batches,
// project every hitter, and rank by projected WAR.

use std::collections::HashMap;

use async_trait::async_trait;
use careerarc_core::projection::{AgingCurvePoint, RatePoint};
use careerarc_core::resolver::PlayerKey;
use careerarc_core::{HitterInput, Level, Projection, ProjectionEngine, SeasonRecord, TrajectoryPoint};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data::{Player, Priors};

// ---------------------------------------------------------------------------
// Season sources
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("season source '{source_name}' failed for player {player_id}: {message}")]
    Fetch {
        source_name: &'static str,
        player_id: u64,
        message: String,
    },
}

/// Supplies a player's season records.
#[async_trait]
pub trait SeasonSource: Send + Sync {
    /// All season records for `player_id`. An unknown player has no records.
    async fn seasons(&self, player_id: u64) -> Result<Vec<SeasonRecord>, SourceError>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Season records already loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    seasons: HashMap<u64, Vec<SeasonRecord>>,
}

impl InMemorySource {
    pub fn new(seasons: HashMap<u64, Vec<SeasonRecord>>) -> Self {
        InMemorySource { seasons }
    }
}

#[async_trait]
impl SeasonSource for InMemorySource {
    async fn seasons(&self, player_id: u64) -> Result<Vec<SeasonRecord>, SourceError> {
        Ok(self.seasons.get(&player_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The player's line for the engine's "now" season, as it was actually played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastSeason {
    pub season: i32,
    pub level: Level,
    pub pa: u32,
    pub hr: u32,
    pub sb: u32,
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
}

impl LastSeason {
    /// The highest-PA split of `season`. `None` when the player did not bat
    /// that year.
    fn from_records(records: &[SeasonRecord], season: i32) -> Option<Self> {
        records
            .iter()
            .filter(|r| r.season == season && r.pa > 0)
            .max_by_key(|r| r.pa)
            .map(|r| LastSeason {
                season: r.season,
                level: r.level,
                pa: r.pa,
                hr: r.hr,
                sb: r.sb,
                avg: r.rates.avg,
                obp: r.rates.obp,
                slg: r.rates.slg,
                ops: r.rates.ops,
            })
    }
}

/// Full single-player output.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player: Player,
    pub projection: Projection,
    pub trajectory: Vec<TrajectoryPoint>,
    pub rate_trajectory: Vec<RatePoint>,
    pub aging_curve: Vec<AgingCurvePoint>,
    /// Sum of positive WAR across the trajectory.
    pub cumulative_war: f64,
    pub peak_age: u32,
    pub last_season: Option<LastSeason>,
}

/// One ranked leaderboard entry.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub id: u64,
    pub name: String,
    pub team: String,
    pub position: String,
    pub age: u32,
    pub projection: Projection,
    pub trajectory: Vec<TrajectoryPoint>,
    pub cumulative_war: f64,
    pub peak_age: u32,
    pub last_season: Option<LastSeason>,
}

impl From<PlayerReport> for LeaderboardRow {
    fn from(report: PlayerReport) -> Self {
        LeaderboardRow {
            id: report.player.id,
            name: report.player.name,
            team: report.player.team,
            position: report.player.position_code,
            age: report.player.age,
            projection: report.projection,
            trajectory: report.trajectory,
            cumulative_war: report.cumulative_war,
            peak_age: report.peak_age,
            last_season: report.last_season,
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Project one player from their season records and priors.
///
/// Returns `None` when no record has enough plate appearances.
pub fn build_report(
    engine: &ProjectionEngine,
    player: &Player,
    records: &[SeasonRecord],
    priors: &Priors,
) -> Option<PlayerReport> {
    let key = PlayerKey::new(Some(player.id), &player.name);
    let future_value = priors.future_values.resolve(&key).copied();
    let batted_ball = priors.batted_ball.resolve(&key).copied();

    let input = HitterInput {
        records,
        age: player.age,
        position: player.position,
        future_value,
        batted_ball,
    };
    let projection = engine.project(&input)?;

    let trajectory = engine.project_forward(&projection, player.age, player.position);
    let rate_trajectory =
        engine.project_rate_trajectory(&projection, player.age, player.position, batted_ball.as_ref());
    let aging_curve = engine.aging_curve(player.position, projection.war);
    let cumulative_war = trajectory.iter().map(|p| p.war.max(0.0)).sum();

    Some(PlayerReport {
        player: player.clone(),
        trajectory,
        rate_trajectory,
        aging_curve,
        cumulative_war,
        peak_age: engine.tables().aging_profile(player.position).peak,
        last_season: LastSeason::from_records(records, engine.season()),
        projection,
    })
}

/// Project every non-pitcher in `players` and rank by projected WAR.
///
/// Season records are fetched `batch_size` players at a time, concurrently
/// within a batch. A player whose fetch fails is logged and left out; so is
/// one without enough data to project.
pub async fn run_leaderboard<S>(
    engine: &ProjectionEngine,
    players: &[Player],
    source: &S,
    priors: &Priors,
    batch_size: usize,
) -> Vec<LeaderboardRow>
where
    S: SeasonSource + ?Sized,
{
    let hitters: Vec<&Player> = players.iter().filter(|p| !p.is_pitcher()).collect();
    info!(
        "leaderboard: {} hitters ({} pitchers skipped) from {}",
        hitters.len(),
        players.len() - hitters.len(),
        source.name()
    );

    let mut rows = Vec::with_capacity(hitters.len());
    for (i, batch) in hitters.chunks(batch_size.max(1)).enumerate() {
        let fetched = join_all(batch.iter().map(|&player| async move {
            (player, source.seasons(player.id).await)
        }))
        .await;
        debug!("batch {}: fetched {} players", i + 1, fetched.len());

        for (player, result) in fetched {
            let records = match result {
                Ok(records) => records,
                Err(e) => {
                    warn!("skipping {} ({}): {}", player.name, player.id, e);
                    continue;
                }
            };
            match build_report(engine, player, &records, priors) {
                Some(report) => rows.push(LeaderboardRow::from(report)),
                None => debug!("not enough data to project {} ({})", player.name, player.id),
            }
        }
    }

    rows.sort_by(|a, b| b.projection.war.total_cmp(&a.projection.war));
    info!("leaderboard: projected {} hitters", rows.len());
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use careerarc_core::{FutureValue, Position, RateLine};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn player(id: u64, name: &str, code: &str, age: u32) -> Player {
        Player {
            id,
            name: name.into(),
            team: "TST".into(),
            position_code: code.into(),
            position: Position::from_code(code),
            age,
        }
    }

    fn record(season: i32, level: Level, pa: u32, ops: f64) -> SeasonRecord {
        SeasonRecord {
            season,
            level,
            pa,
            hr: pa / 30,
            sb: 4,
            rates: RateLine {
                obp: ops * 0.43,
                slg: ops * 0.57,
                ops,
                avg: ops * 0.33,
            },
        }
    }

    fn source() -> InMemorySource {
        InMemorySource::new(HashMap::from([
            (1, vec![record(2025, Level::Mlb, 620, 0.880), record(2024, Level::Mlb, 600, 0.850)]),
            (2, vec![record(2025, Level::Mlb, 580, 0.700)]),
            (3, vec![record(2025, Level::Mlb, 640, 0.900)]),
            (4, vec![record(2025, Level::Mlb, 12, 0.950)]),
            (5, vec![record(2025, Level::DoubleA, 420, 0.860), record(2025, Level::HighA, 150, 0.900)]),
        ]))
    }

    /// Records the size of each concurrent wave and can fail one player.
    struct CountingSource {
        inner: InMemorySource,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<Vec<u64>>,
        fail_id: Option<u64>,
    }

    #[async_trait]
    impl SeasonSource for CountingSource {
        async fn seasons(&self, player_id: u64) -> Result<Vec<SeasonRecord>, SourceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.calls.lock().unwrap().push(player_id);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if Some(player_id) == self.fail_id {
                return Err(SourceError::Fetch {
                    source_name: self.name(),
                    player_id,
                    message: "timed out".into(),
                });
            }
            self.inner.seasons(player_id).await
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn counting(fail_id: Option<u64>) -> CountingSource {
        CountingSource {
            inner: source(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            fail_id,
        }
    }

    #[tokio::test]
    async fn rows_are_sorted_by_war_and_pitchers_skipped() {
        let engine = ProjectionEngine::standard(2025);
        let players = vec![
            player(1, "Ana Brooks", "RF", 27),
            player(2, "Ben Cole", "2B", 29),
            player(3, "Cal Drew", "SS", 26),
            player(9, "Pete Arm", "1", 28),
        ];
        let src = counting(None);
        let rows = run_leaderboard(&engine, &players, &src, &Priors::default(), 15).await;

        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].projection.war >= w[1].projection.war));
        assert!(!src.calls.lock().unwrap().contains(&9));
        assert_eq!(rows[0].id, 3);
    }

    #[tokio::test]
    async fn batches_bound_concurrency() {
        let engine = ProjectionEngine::standard(2025);
        let players: Vec<Player> = (1..=5).map(|id| player(id, &format!("P{id}"), "CF", 24)).collect();
        let src = counting(None);
        run_leaderboard(&engine, &players, &src, &Priors::default(), 2).await;

        assert_eq!(src.calls.lock().unwrap().len(), 5);
        assert!(src.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn failed_fetch_and_thin_data_are_left_out() {
        let engine = ProjectionEngine::standard(2025);
        let players = vec![
            player(1, "Ana Brooks", "RF", 27),
            player(2, "Ben Cole", "2B", 29),
            player(4, "Dee Ford", "LF", 25),
            player(77, "Nobody Known", "C", 22),
        ];
        let src = counting(Some(2));
        let rows = run_leaderboard(&engine, &players, &src, &Priors::default(), 15).await;

        let ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn zero_batch_size_still_runs() {
        let engine = ProjectionEngine::standard(2025);
        let players = vec![player(1, "Ana Brooks", "RF", 27)];
        let rows = run_leaderboard(&engine, &players, &source(), &Priors::default(), 0).await;
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn report_uses_priors_and_latest_split() {
        let engine = ProjectionEngine::standard(2025);
        let mut priors = Priors::default();
        priors.future_values.insert_name("Eli Grant", FutureValue::new(55));
        let p = player(5, "Eli Grant", "SS", 21);
        let records = source().seasons.remove(&5).unwrap();

        let report = build_report(&engine, &p, &records, &priors).expect("projects");
        assert_eq!(report.projection.future_value, Some(FutureValue::new(55)));
        assert_eq!(report.peak_age, 26);
        assert_eq!(report.trajectory.len(), 10);
        assert_eq!(report.rate_trajectory.len(), 3);
        assert_eq!(report.aging_curve.len(), 21);

        let last = report.last_season.expect("has seasons");
        assert_eq!(last.level, Level::DoubleA);
        assert_eq!(last.pa, 420);

        let positive: f64 = report.trajectory.iter().map(|t| t.war.max(0.0)).sum();
        assert!((report.cumulative_war - positive).abs() < 1e-12);
    }

    #[test]
    fn idle_player_has_no_last_season() {
        let engine = ProjectionEngine::standard(2025);
        let p = player(6, "Cal Whitman", "2B", 29);
        let records = vec![
            record(2025, Level::Mlb, 0, 0.000),
            record(2022, Level::Mlb, 560, 0.790),
            record(2021, Level::Mlb, 540, 0.760),
        ];

        let report = build_report(&engine, &p, &records, &Priors::default()).expect("projects");
        assert_eq!(report.last_season, None);
    }
}
