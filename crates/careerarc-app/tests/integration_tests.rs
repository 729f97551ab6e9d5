// Integration tests for careerarc.
//
// These tests load the CSV fixtures through the library's public API and run
// them through the projection engine and the leaderboard runner.

use careerarc_app::config::DataPaths;
use careerarc_app::data::{self, Dataset, Priors};
use careerarc_app::leaderboard::{self, InMemorySource, SeasonSource};
use careerarc_core::{FutureValue, Level, Position, ProjectionEngine};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

const SEASON: i32 = 2025;

fn fixture_paths() -> DataPaths {
    DataPaths {
        players: format!("{FIXTURES}/players.csv"),
        seasons: format!("{FIXTURES}/seasons.csv"),
        future_values: Some(format!("{FIXTURES}/future_values.csv")),
        batted_ball: Some(format!("{FIXTURES}/batted_ball.csv")),
    }
}

fn load_fixtures() -> Dataset {
    data::load_all_from_paths(&fixture_paths()).expect("fixtures should load")
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

// ===========================================================================
// Data loading
// ===========================================================================

#[test]
fn fixtures_load_with_cleanup() {
    let dataset = load_fixtures();
    assert_eq!(dataset.players.len(), 7);

    let pitcher = dataset.players.iter().find(|p| p.id == 1004).unwrap();
    assert!(pitcher.is_pitcher());
    let utility = dataset.players.iter().find(|p| p.id == 1006).unwrap();
    assert_eq!(utility.position, None);
    assert!(!utility.is_pitcher());

    // Missing OPS is derived.
    let vaughn = &dataset.seasons[&1003];
    let derived = vaughn.iter().find(|r| r.season == 2023).unwrap();
    assert!(approx_eq(derived.rates.ops, 0.800, 1e-12));

    // Unknown level falls back to MLB.
    assert_eq!(dataset.seasons[&1006][0].level, Level::Mlb);

    // Malformed row dropped, the rest of the player kept.
    assert_eq!(dataset.seasons[&1007].len(), 1);
}

#[test]
fn optional_prior_files_may_be_absent() {
    let paths = DataPaths {
        future_values: None,
        batted_ball: None,
        ..fixture_paths()
    };
    let dataset = data::load_all_from_paths(&paths).unwrap();
    assert!(dataset.priors.future_values.is_empty());
    assert!(dataset.priors.batted_ball.is_empty());
}

#[test]
fn missing_player_file_is_an_error() {
    let paths = DataPaths {
        players: format!("{FIXTURES}/nope.csv"),
        ..fixture_paths()
    };
    assert!(matches!(
        data::load_all_from_paths(&paths),
        Err(data::DataError::Io { .. })
    ));
}

// ===========================================================================
// Projection through the loaded data
// ===========================================================================

#[test]
fn young_graded_prospect_outprojects_older_twin() {
    let dataset = load_fixtures();
    let engine = ProjectionEngine::standard(SEASON);

    let report_for = |id: u64| {
        let player = dataset.players.iter().find(|p| p.id == id).unwrap();
        leaderboard::build_report(&engine, player, &dataset.seasons[&id], &dataset.priors)
            .expect("projects")
    };
    let prospect = report_for(1001);
    let older = report_for(1002);

    assert_eq!(prospect.projection.future_value, Some(FutureValue::new(60)));
    assert_eq!(older.projection.future_value, None);
    assert!(prospect.projection.ops > older.projection.ops + 0.05);
    assert!(prospect.projection.rci > older.projection.rci);
    assert_eq!(prospect.peak_age, 26);
}

#[test]
fn batted_ball_profile_lifts_projection() {
    let dataset = load_fixtures();
    let engine = ProjectionEngine::standard(SEASON);
    let player = dataset.players.iter().find(|p| p.id == 1003).unwrap();
    let records = &dataset.seasons[&1003];

    let with = leaderboard::build_report(&engine, player, records, &dataset.priors).unwrap();
    let without = leaderboard::build_report(&engine, player, records, &Priors::default()).unwrap();

    assert!(with.projection.ops > without.projection.ops);
    assert!(with.rate_trajectory[0].ops > without.rate_trajectory[0].ops);
    assert_eq!(with.projection.highest_level, Level::Mlb);
    assert_eq!(with.trajectory[0].season, SEASON + 1);
    assert_eq!(with.trajectory[0].age, 28);
}

#[test]
fn name_only_prior_reaches_unknown_position_player() {
    let dataset = load_fixtures();
    let engine = ProjectionEngine::standard(SEASON);
    let player = dataset.players.iter().find(|p| p.id == 1006).unwrap();
    let report =
        leaderboard::build_report(&engine, player, &dataset.seasons[&1006], &dataset.priors).unwrap();

    assert_eq!(report.projection.future_value, Some(FutureValue::new(45)));
    assert_eq!(report.peak_age, engine.tables().default_aging_profile().peak);
    let band = engine.tables().benchmark(FutureValue::new(45)).war;
    assert!(report.projection.war >= band * 0.3 && report.projection.war <= band * 1.3);
}

// ===========================================================================
// Leaderboard
// ===========================================================================

#[tokio::test]
async fn leaderboard_ranks_projectable_hitters() {
    let dataset = load_fixtures();
    let engine = ProjectionEngine::standard(SEASON);
    let source = InMemorySource::new(dataset.seasons.clone());

    let rows = leaderboard::run_leaderboard(&engine, &dataset.players, &source, &dataset.priors, 2).await;

    let mut ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
    assert!(rows.windows(2).all(|w| w[0].projection.war >= w[1].projection.war));
    ids.sort_unstable();
    // 1004 is a pitcher, 1007 has no qualifying season.
    assert_eq!(ids, vec![1001, 1002, 1003, 1005, 1006]);

    for row in &rows {
        let positive: f64 = row.trajectory.iter().map(|t| t.war.max(0.0)).sum();
        assert!(approx_eq(row.cumulative_war, positive, 1e-9));
        assert!(row.last_season.is_some());
    }

    let catcher = rows.iter().find(|r| r.id == 1005).unwrap();
    assert_eq!(catcher.position, "2");
    assert_eq!(catcher.peak_age, engine.tables().aging_profile(Some(Position::Catcher)).peak);
}

#[tokio::test]
async fn leaderboard_serializes_to_json() {
    let dataset = load_fixtures();
    let engine = ProjectionEngine::standard(SEASON);
    let source = InMemorySource::new(dataset.seasons.clone());

    let rows = leaderboard::run_leaderboard(&engine, &dataset.players, &source, &dataset.priors, 15).await;
    let json = serde_json::to_value(&rows).unwrap();

    let first = &json[0];
    assert!(first["projection"]["rci"].is_i64());
    assert!(first["projection"]["highest_level"].is_string());
    assert!(first["trajectory"].as_array().is_some_and(|t| t.len() == 10));
    assert_eq!(first["last_season"]["season"], 2025);
}

#[tokio::test]
async fn in_memory_source_returns_empty_for_unknown_player() {
    let source = InMemorySource::new(load_fixtures().seasons);
    assert!(source.seasons(424242).await.unwrap().is_empty());
    assert_eq!(source.seasons(1003).await.unwrap().len(), 3);
}
