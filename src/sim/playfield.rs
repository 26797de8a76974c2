//! Playfield rectangle and the layout rules derived from it

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_FRACTION;

/// The drawable rectangle. Everything else is laid out from these two numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Y coordinate of the ground line
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height * GROUND_FRACTION
    }

    /// Height of the ground band below the ground line
    #[inline]
    pub fn ground_height(&self) -> f32 {
        self.height - self.ground_y()
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
