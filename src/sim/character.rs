//! The two wall-pinned characters and their jump kinematics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::playfield::Playfield;
use crate::consts::{CHARACTER_HEIGHT, CHARACTER_WIDTH};

/// Which wall a character is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Stable slot for per-side arrays (left first)
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// A jumping character. `pos` is the top-left corner of its body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub side: Side,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity in units per tick (negative is up)
    pub velocity_y: f32,
    pub is_jumping: bool,
}

impl Character {
    pub fn new(field: &Playfield, side: Side) -> Self {
        let mut character = Self {
            side,
            pos: Vec2::ZERO,
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
            velocity_y: 0.0,
            is_jumping: false,
        };
        character.pos = Vec2::new(character.wall_x(field), character.resting_y(field));
        character
    }

    /// Y of the top edge when standing on the ground
    #[inline]
    pub fn resting_y(&self, field: &Playfield) -> f32 {
        field.ground_y() - self.height
    }

    fn wall_x(&self, field: &Playfield) -> f32 {
        match self.side {
            Side::Left => 0.0,
            Side::Right => (field.width - self.width).max(0.0),
        }
    }

    /// Stand still on the ground at the home wall
    pub fn reset(&mut self, field: &Playfield) {
        self.velocity_y = 0.0;
        self.is_jumping = false;
        self.pos = Vec2::new(self.wall_x(field), self.resting_y(field));
    }

    /// Launch with `jump_force` (negative). Only works from the ground.
    pub fn jump(&mut self, jump_force: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.velocity_y = jump_force;
        self.is_jumping = true;
        true
    }

    /// Integrate one tick of flight; lands exactly on the resting height.
    pub fn update(&mut self, field: &Playfield, gravity: f32) {
        if !self.is_jumping {
            return;
        }

        self.velocity_y += gravity;
        self.pos.y += self.velocity_y;

        let rest = self.resting_y(field);
        if self.pos.y >= rest {
            self.pos.y = rest;
            self.velocity_y = 0.0;
            self.is_jumping = false;
        }
    }

    /// Re-derive position after the playfield changed size. Height above the
    /// ground is kept so a jump in progress continues undisturbed.
    pub fn relayout(&mut self, old: &Playfield, new: &Playfield) {
        let lift = self.resting_y(old) - self.pos.y;
        self.pos.x = self.wall_x(new);
        self.pos.y = self.resting_y(new) - lift.max(0.0);
    }

    /// Point under the character's feet, used for dust particles
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.velocity_y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_GRAVITY, DEFAULT_JUMP_FORCE};
    use proptest::prelude::*;

    fn field() -> Playfield {
        Playfield::new(800.0, 400.0)
    }

    #[test]
    fn test_pinned_to_walls() {
        let field = field();
        let left = Character::new(&field, Side::Left);
        let right = Character::new(&field, Side::Right);
        assert_eq!(left.pos, Vec2::new(0.0, 260.0));
        assert_eq!(right.pos, Vec2::new(760.0, 260.0));
    }

    #[test]
    fn test_double_jump_is_rejected() {
        let field = field();
        let mut character = Character::new(&field, Side::Left);

        assert!(character.jump(DEFAULT_JUMP_FORCE));
        assert_eq!(character.velocity_y, -15.0);
        character.update(&field, DEFAULT_GRAVITY);
        let velocity_after_tick = character.velocity_y;
        assert!((velocity_after_tick - -14.2).abs() < 1e-5);

        assert!(!character.jump(DEFAULT_JUMP_FORCE));
        assert_eq!(character.velocity_y, velocity_after_tick);
        assert!(character.is_jumping);
    }

    #[test]
    fn test_lands_exactly_on_rest() {
        let field = field();
        let mut character = Character::new(&field, Side::Right);
        character.jump(DEFAULT_JUMP_FORCE);

        let mut ticks = 0;
        while character.is_jumping {
            character.update(&field, DEFAULT_GRAVITY);
            ticks += 1;
            assert!(ticks < 1000, "never landed");
        }

        assert_eq!(character.pos.y, character.resting_y(&field));
        assert_eq!(character.velocity_y, 0.0);
        // Can jump again once grounded
        assert!(character.jump(DEFAULT_JUMP_FORCE));
    }

    #[test]
    fn test_relayout_keeps_lift() {
        let small = field();
        let tall = Playfield::new(1000.0, 500.0);
        let mut character = Character::new(&small, Side::Right);
        character.pos.y -= 30.0;

        character.relayout(&small, &tall);
        assert_eq!(character.pos.x, 960.0);
        assert_eq!(character.pos.y, character.resting_y(&tall) - 30.0);
    }

    proptest! {
        #[test]
        fn prop_never_sinks_below_ground(
            gravity in 0.01f32..5.0,
            jump_force in -40.0f32..-0.1,
            ticks in 1usize..600,
        ) {
            let field = field();
            let mut character = Character::new(&field, Side::Left);
            character.jump(jump_force);
            for _ in 0..ticks {
                character.update(&field, gravity);
                prop_assert!(character.pos.y <= character.resting_y(&field));
                prop_assert_eq!(
                    character.is_jumping,
                    character.pos.y != character.resting_y(&field) || character.velocity_y != 0.0
                );
            }
        }
    }
}
