//! Character/ball overlap and the perfect-timing verdict
//!
//! Both bodies are treated as axis-aligned boxes. Perfection only looks at
//! the vertical axis: each character owns a fixed wall, so where the ball is
//! horizontally says nothing about how well the jump was timed.

use glam::Vec2;

use super::ball::Ball;
use super::character::Character;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResult {
    /// Whether the boxes overlap
    pub collided: bool,
    /// Ball centre inside the character's middle third (only meaningful on a hit)
    pub perfect: bool,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: boxes that merely touch do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

impl Character {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Vertical band `[start, end]` of the perfect-hit zone
    pub fn perfect_zone(&self) -> (f32, f32) {
        let third = self.height / 3.0;
        (self.pos.y + third, self.pos.y + 2.0 * third)
    }
}

impl Ball {
    /// Collision box: a `2 * radius` square around the drawn circle
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.radius() * 2.0))
    }
}

/// Test one character against the ball
pub fn test_collision(character: &Character, ball: &Ball) -> CollisionResult {
    if ball.is_resetting() {
        return CollisionResult::miss();
    }

    if !character.bounds().overlaps(&ball.bounds()) {
        return CollisionResult::miss();
    }

    let (zone_start, zone_end) = character.perfect_zone();
    let ball_center_y = ball.center().y;

    CollisionResult {
        collided: true,
        perfect: ball_center_y >= zone_start && ball_center_y <= zone_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::Side;
    use crate::sim::playfield::Playfield;
    use proptest::prelude::*;

    fn field() -> Playfield {
        Playfield::new(800.0, 400.0)
    }

    #[test]
    fn test_resting_character_hits_ball_at_wall_but_not_perfect() {
        let field = field();
        let character = Character::new(&field, Side::Right);
        let mut ball = Ball::new(&field);
        ball.pos.x = 770.0;

        let result = test_collision(&character, &ball);
        assert!(result.collided);
        // Ball centre (310) sits in the lower third of a resting body (260..320)
        assert!(!result.perfect);
    }

    #[test]
    fn test_perfect_zone_is_middle_third() {
        let field = field();
        let mut character = Character::new(&field, Side::Left);
        // Body 240..300 ends exactly where the ball (300..320) begins
        character.pos.y = 240.0;
        let mut ball = Ball::new(&field);
        ball.pos.x = 10.0;
        assert_eq!(test_collision(&character, &ball), CollisionResult::miss());

        // Overlapping, but the ball centre (310) is below the middle third (265..285)
        character.pos.y = 245.0;
        assert_eq!(
            test_collision(&character, &ball),
            CollisionResult {
                collided: true,
                perfect: false
            }
        );

        // Pushed below rest so the middle third (290..310) reaches the ball centre
        character.pos.y = 270.0;
        let result = test_collision(&character, &ball);
        assert!(result.collided);
        assert!(result.perfect);
    }

    #[test]
    fn test_no_collision_while_resetting() {
        let field = field();
        let character = Character::new(&field, Side::Left);
        let mut ball = Ball::new(&field);
        ball.reset(&field, 0.0);
        ball.pos.x = 0.0;
        assert_eq!(test_collision(&character, &ball), CollisionResult::miss());
    }

    #[test]
    fn test_jumped_clear_misses() {
        let field = field();
        let mut character = Character::new(&field, Side::Left);
        character.pos.y = 200.0; // feet at 260, ball top at 300
        let mut ball = Ball::new(&field);
        ball.pos.x = 5.0;
        assert!(!test_collision(&character, &ball).collided);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
    }

    proptest! {
        #[test]
        fn prop_perfect_verdict_is_mirror_symmetric(
            lift in 0.0f32..120.0,
            inset in 0.0f32..35.0,
        ) {
            let field = field();
            let mut left = Character::new(&field, Side::Left);
            let mut right = Character::new(&field, Side::Right);
            left.pos.y -= lift;
            right.pos.y -= lift;

            let mut ball_left = Ball::new(&field);
            ball_left.pos.x = inset;
            let mut ball_right = Ball::new(&field);
            // Mirror the ball's box across the vertical centre line
            ball_right.pos.x = field.width - inset - ball_right.size;

            let a = test_collision(&left, &ball_left);
            let b = test_collision(&right, &ball_right);
            prop_assert_eq!(a, b);
        }
    }
}
