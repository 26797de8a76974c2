//! Hemi Bounce - a bilateral bouncing-ball game
//!
//! Core modules:
//! - `sim`: Simulation (ball and character physics, collisions, scoring, stats)
//! - `effects`: Decorative clouds, particles and ball trail
//! - `game`: Session state machine and frame loop driver
//! - `renderer`: 2-D drawing surface and WebGPU backend
//! - `audio`: Binaural ambience and event cues
//! - `hud`: Score/stats display collaborator

pub mod audio;
pub mod effects;
pub mod game;
pub mod highscores;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{FrameStatus, GameController};
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Per-tick quantities (speeds, gravity, decay) assume `TICK_HZ`. The
/// controller feeds the simulation fixed ticks at that rate regardless of
/// the display refresh rate.
pub mod consts {
    /// Simulation tick rate the per-tick constants are tuned for
    pub const TICK_HZ: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame interval fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ground line as a fraction of playfield height
    pub const GROUND_FRACTION: f32 = 0.8;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_DEFAULT_SPEED: f32 = 5.0;
    /// Speed floor so the ball can never stall
    pub const BALL_MIN_SPEED: f32 = 2.0;
    /// Non-interactive window after a reset (wall-clock milliseconds)
    pub const BALL_RESET_MS: f64 = 1000.0;

    /// Character defaults
    pub const CHARACTER_WIDTH: f32 = 40.0;
    pub const CHARACTER_HEIGHT: f32 = 60.0;
    pub const DEFAULT_GRAVITY: f32 = 0.8;
    pub const DEFAULT_JUMP_FORCE: f32 = -15.0;

    /// Slider default for ball speed
    pub const DEFAULT_SPEED_SETTING: i32 = 5;

    /// Scoring
    pub const HIT_POINTS: u64 = 50;
    pub const PERFECT_HIT_POINTS: u64 = 100;
    pub const CYCLE_BONUS_POINTS: u64 = 10;
    /// Cycle bonus fires below this fraction of the width...
    pub const CYCLE_LEFT_THRESHOLD: f32 = 0.1;
    /// ...and re-arms above this one
    pub const CYCLE_RIGHT_THRESHOLD: f32 = 0.9;

    /// Effects
    pub const PARTICLE_DECAY: f32 = 0.02;
    pub const COLLISION_BURST: usize = 10;
    pub const DEFAULT_MAX_PARTICLES: usize = 50;
    pub const DEFAULT_TRAIL_LENGTH: usize = 20;
    pub const DEFAULT_CLOUD_COUNT: usize = 5;
}
