//! Game state and core simulation types
//!
//! Everything the fixed-step tick reads or writes lives here. Decorative
//! state (clouds, particles, trail) does not: it belongs to `effects`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::character::{Character, Side};
use super::scoring::{Scoreboard, ScoringPolicy};
use super::stats::SessionStats;
use super::playfield::Playfield;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing running, waiting for start
    #[default]
    Idle,
    /// Active play
    Running,
    /// Ended by a collision; start begins a fresh session
    GameOver,
}

/// Something that happened during a tick that the shell may want to react
/// to (sound, particles, display)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball reached a wall; `point` is the contact point on the wall
    WallBounce { side: Side, point: Vec2 },
    /// Rally contact that scored
    Hit {
        side: Side,
        perfect: bool,
        points: u64,
        point: Vec2,
    },
    /// Ball completed a right-then-left traversal
    CycleBonus { points: u64 },
    /// Ball left a character's column after bouncing there, untouched
    Cleared { side: Side },
    /// Obstacle contact ended the session
    GameOver { side: Side },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub playfield: Playfield,
    pub ball: Ball,
    pub left: Character,
    pub right: Character,
    pub scoreboard: Scoreboard,
    pub stats: SessionStats,
    pub phase: GamePhase,
}

impl GameState {
    pub fn new(playfield: Playfield, policy: ScoringPolicy) -> Self {
        Self {
            ball: Ball::new(&playfield),
            left: Character::new(&playfield, Side::Left),
            right: Character::new(&playfield, Side::Right),
            scoreboard: Scoreboard::new(policy),
            stats: SessionStats::default(),
            phase: GamePhase::Idle,
            playfield,
        }
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score
    }

    pub fn character(&self, side: Side) -> &Character {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn character_mut(&mut self, side: Side) -> &mut Character {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Fresh session: zero stats, then everything `reset_play` covers
    pub fn begin_session(&mut self, now_ms: f64) {
        self.stats.reset(now_ms);
        self.reset_play(now_ms);
    }

    /// Zero the score, re-centre the ball (frozen for the reset window),
    /// ground both characters and enter `Running`. Stats are left alone.
    pub fn reset_play(&mut self, now_ms: f64) {
        self.scoreboard.reset();
        self.ball.reset(&self.playfield, now_ms);
        self.left.reset(&self.playfield);
        self.right.reset(&self.playfield);
        self.phase = GamePhase::Running;
    }

    /// Launch `side`'s character. A successful jump is counted right away
    /// and judged once contact, clearance or landing decides it.
    pub fn jump(&mut self, side: Side, jump_force: f32) -> bool {
        if !self.character_mut(side).jump(jump_force) {
            return false;
        }
        self.stats.record_jump_start();
        self.scoreboard.note_jump(side);
        true
    }

    /// Re-lay every entity out for a new playfield size
    pub fn resize(&mut self, width: f32, height: f32) {
        let old = self.playfield;
        let new = Playfield::new(width, height);
        self.ball.relayout(&old, &new);
        self.left.relayout(&old, &new);
        self.right.relayout(&old, &new);
        self.playfield = new;
    }

    /// False if any entity picked up a NaN or infinity
    pub fn is_finite(&self) -> bool {
        self.ball.is_finite() && self.left.is_finite() && self.right.is_finite()
    }
}
