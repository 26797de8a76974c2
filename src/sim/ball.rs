//! The ball: a fixed-size disc rolling along the ground between the walls

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::playfield::Playfield;
use crate::consts::*;

/// Ball entity. `pos` is the top-left corner of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// Horizontal speed in units per tick
    pub speed: f32,
    /// +1.0 moving right, -1.0 moving left
    pub direction: f32,
    /// Wall-clock deadline (ms) until which the ball is frozen after a reset
    #[serde(default)]
    reset_until: Option<f64>,
}

impl Ball {
    /// Create a ball centred on the playfield, resting on the ground
    pub fn new(field: &Playfield) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            size: BALL_SIZE,
            speed: BALL_DEFAULT_SPEED,
            direction: 1.0,
            reset_until: None,
        };
        ball.center_on(field);
        ball
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius())
    }

    /// Rightmost legal x for the top-left corner
    #[inline]
    pub fn max_x(&self, field: &Playfield) -> f32 {
        (field.width - self.size).max(0.0)
    }

    pub fn is_resetting(&self) -> bool {
        self.reset_until.is_some()
    }

    /// Put the ball back in the middle, heading right at default speed, and
    /// freeze it for `BALL_RESET_MS` of wall-clock time.
    pub fn reset(&mut self, field: &Playfield, now_ms: f64) {
        self.center_on(field);
        self.direction = 1.0;
        self.speed = BALL_DEFAULT_SPEED;
        self.reset_until = Some(now_ms + BALL_RESET_MS);
    }

    /// Clear the reset freeze once its deadline has passed
    pub fn release_if_due(&mut self, now_ms: f64) {
        if self.reset_until.is_some_and(|deadline| now_ms >= deadline) {
            self.reset_until = None;
        }
    }

    /// Move one tick. Returns true if the ball bounced off a wall.
    ///
    /// The bounce is discrete: the ball is clamped to the wall it reached and
    /// its direction flips, so it never overshoots the playfield.
    pub fn advance(&mut self, field: &Playfield, speed_hint: Option<f32>) -> bool {
        if self.is_resetting() {
            return false;
        }

        self.speed = speed_hint.unwrap_or(self.speed).max(BALL_MIN_SPEED);

        let max_x = self.max_x(field);
        let next_x = self.pos.x + self.speed * self.direction;

        if next_x <= 0.0 {
            self.pos.x = 0.0;
            self.direction = 1.0;
            true
        } else if next_x >= max_x {
            self.pos.x = max_x;
            self.direction = -1.0;
            true
        } else {
            self.pos.x = next_x;
            false
        }
    }

    /// Re-derive position after the playfield changed size.
    ///
    /// Horizontal position keeps its fraction of the travel span, vertical is
    /// pinned to the new ground line. Calling it twice with the same sizes is
    /// a no-op.
    pub fn relayout(&mut self, old: &Playfield, new: &Playfield) {
        let old_span = self.max_x(old);
        let t = if old_span > 0.0 {
            (self.pos.x / old_span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.pos.x = t * self.max_x(new);
        self.pos.y = new.ground_y() - self.size;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.speed.is_finite()
    }

    fn center_on(&mut self, field: &Playfield) {
        self.pos = Vec2::new(
            (field.width / 2.0 - self.size / 2.0).max(0.0),
            field.ground_y() - self.size,
        );
    }
}
