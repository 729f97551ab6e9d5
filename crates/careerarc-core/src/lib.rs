// Library root: the hitter projection engine.
//
// Everything in this crate is synchronous and free of I/O. Season records,
// scouting grades and batted-ball data come in from the caller; structured
// projections go back out.

pub mod level;
pub mod position;
pub mod projection;
pub mod record;
pub mod resolver;
pub mod tables;
pub mod tuning;

pub use level::Level;
pub use position::Position;
pub use projection::{HitterInput, Projection, ProjectionEngine, TrajectoryPoint};
pub use record::{BattedBallProfile, FutureValue, RateLine, SeasonRecord};
pub use tables::ReferenceTables;
pub use tuning::Tuning;
