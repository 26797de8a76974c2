//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only (one `tick` per 1/60 s)
//! - Wall-clock time passed in, never read
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod character;
pub mod collision;
pub mod playfield;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod tick;

pub use ball::Ball;
pub use character::{Character, Side};
pub use collision::{Aabb, CollisionResult, test_collision};
pub use playfield::Playfield;
pub use scoring::{ContactOutcome, Scoreboard, ScoringPolicy};
pub use state::{GameEvent, GamePhase, GameState};
pub use stats::{SessionStats, StatsSnapshot, format_duration};
pub use tick::{TickInput, tick};
