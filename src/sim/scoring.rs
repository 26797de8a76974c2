//! Scoring policy and the bookkeeping that keeps each event counted once

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::character::Side;
use super::collision::CollisionResult;
use super::playfield::Playfield;
use crate::consts::*;

/// What a character touching the ball means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringPolicy {
    /// The ball is an obstacle: any contact ends the game. Jumping clear of it
    /// is the skill being practised.
    #[default]
    Obstacle,
    /// Contacts score points (more for a perfect one) and play continues
    Rally,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Obstacle => "obstacle",
            ScoringPolicy::Rally => "rally",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "obstacle" | "avoid" => Some(ScoringPolicy::Obstacle),
            "rally" => Some(ScoringPolicy::Rally),
            _ => None,
        }
    }
}

/// Outcome of a contact under the active policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Still the same contact as last tick, nothing new
    Ongoing,
    /// Rally hit worth `points`
    Scored { points: u64, perfect: bool },
    /// Obstacle policy: the session is over
    Fatal,
}

/// Score plus the latches that debounce contacts, cycles and clearances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub policy: ScoringPolicy,
    pub score: u64,
    /// Re-armed when the ball passes the right threshold
    cycle_armed: bool,
    /// Character currently overlapping the ball, per side
    in_contact: [bool; 2],
    /// Ball bounced at this side's wall and has not yet left the character
    pending_clear: [bool; 2],
    /// Character jumped and the jump has not been judged yet
    jump_pending: [bool; 2],
}

impl Scoreboard {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Fresh session: zero score and drop every latch
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    /// Feed one character's collision verdict for this tick
    pub fn register_contact(&mut self, side: Side, result: CollisionResult) -> Option<ContactOutcome> {
        let slot = side.index();
        if !result.collided {
            self.in_contact[slot] = false;
            return None;
        }

        if self.in_contact[slot] {
            return Some(ContactOutcome::Ongoing);
        }
        self.in_contact[slot] = true;
        self.pending_clear[slot] = false;

        Some(match self.policy {
            ScoringPolicy::Obstacle => ContactOutcome::Fatal,
            ScoringPolicy::Rally => {
                let points = if result.perfect {
                    PERFECT_HIT_POINTS
                } else {
                    HIT_POINTS
                };
                self.score += points;
                ContactOutcome::Scored {
                    points,
                    perfect: result.perfect,
                }
            }
        })
    }

    /// Award the cycle bonus when a leftward ball crosses the left threshold
    /// after having visited the right side. Returns true when awarded.
    pub fn check_cycle(&mut self, ball: &Ball, field: &Playfield) -> bool {
        if ball.is_resetting() {
            return false;
        }

        let x = ball.pos.x;
        if x > field.width * CYCLE_RIGHT_THRESHOLD {
            self.cycle_armed = true;
        }

        if self.cycle_armed && ball.direction < 0.0 && x < field.width * CYCLE_LEFT_THRESHOLD {
            self.cycle_armed = false;
            self.score += CYCLE_BONUS_POINTS;
            return true;
        }
        false
    }

    /// Remember a jump until contact, clearance or landing judges it
    pub fn note_jump(&mut self, side: Side) {
        self.jump_pending[side.index()] = true;
    }

    /// Claim `side`'s unjudged jump, if there is one
    pub fn take_jump(&mut self, side: Side) -> bool {
        std::mem::take(&mut self.jump_pending[side.index()])
    }

    /// Remember that the ball just reached `side`'s wall
    pub fn note_wall_bounce(&mut self, side: Side) {
        if self.policy == ScoringPolicy::Obstacle && !self.in_contact[side.index()] {
            self.pending_clear[side.index()] = true;
        }
    }

    /// Once the ball has left the character it bounced next to without
    /// touching, that jump counts as a clean clearance.
    pub fn take_clearance(&mut self, side: Side, ball_overlaps_column: bool) -> bool {
        let slot = side.index();
        if self.pending_clear[slot] && !ball_overlaps_column {
            self.pending_clear[slot] = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(perfect: bool) -> CollisionResult {
        CollisionResult {
            collided: true,
            perfect,
        }
    }

    #[test]
    fn test_rally_scores_once_per_contact() {
        let mut board = Scoreboard::new(ScoringPolicy::Rally);

        assert_eq!(
            board.register_contact(Side::Left, hit(false)),
            Some(ContactOutcome::Scored {
                points: HIT_POINTS,
                perfect: false
            })
        );
        assert_eq!(
            board.register_contact(Side::Left, hit(false)),
            Some(ContactOutcome::Ongoing)
        );
        assert_eq!(board.score, 50);

        board.register_contact(Side::Left, CollisionResult::miss());
        board.register_contact(Side::Left, hit(true));
        assert_eq!(board.score, 150);
    }

    #[test]
    fn test_sides_are_independent() {
        let mut board = Scoreboard::new(ScoringPolicy::Rally);
        board.register_contact(Side::Left, hit(false));
        board.register_contact(Side::Right, hit(true));
        assert_eq!(board.score, 150);
    }

    #[test]
    fn test_obstacle_contact_is_fatal_and_scoreless() {
        let mut board = Scoreboard::new(ScoringPolicy::Obstacle);
        assert_eq!(
            board.register_contact(Side::Right, hit(true)),
            Some(ContactOutcome::Fatal)
        );
        assert_eq!(board.score, 0);
    }

    #[test]
    fn test_cycle_bonus_once_per_traversal() {
        let field = Playfield::new(800.0, 400.0);
        let mut ball = Ball::new(&field);
        let mut board = Scoreboard::new(ScoringPolicy::Rally);
        let mut awarded = 0;

        // Two full right-then-left sweeps between 0.95W and 0.05W
        for _ in 0..2 {
            ball.direction = 1.0;
            for x in (40..=760).step_by(5) {
                ball.pos.x = x as f32;
                if board.check_cycle(&ball, &field) {
                    awarded += 1;
                }
            }
            ball.direction = -1.0;
            for x in (40..=760).rev().step_by(5) {
                ball.pos.x = x as f32;
                if board.check_cycle(&ball, &field) {
                    awarded += 1;
                }
            }
        }

        assert_eq!(awarded, 2);
        assert_eq!(board.score, 2 * CYCLE_BONUS_POINTS);
    }

    #[test]
    fn test_cycle_needs_right_visit_first() {
        let field = Playfield::new(800.0, 400.0);
        let mut ball = Ball::new(&field);
        let mut board = Scoreboard::new(ScoringPolicy::Obstacle);
        ball.direction = -1.0;
        ball.pos.x = 10.0;
        assert!(!board.check_cycle(&ball, &field));
    }

    #[test]
    fn test_clearance_resolves_after_ball_leaves() {
        let mut board = Scoreboard::new(ScoringPolicy::Obstacle);
        board.note_wall_bounce(Side::Right);
        assert!(!board.take_clearance(Side::Right, true));
        assert!(board.take_clearance(Side::Right, false));
        assert!(!board.take_clearance(Side::Right, false));
    }

    #[test]
    fn test_jump_is_claimed_once() {
        let mut board = Scoreboard::new(ScoringPolicy::Rally);
        assert!(!board.take_jump(Side::Left));
        board.note_jump(Side::Left);
        assert!(!board.take_jump(Side::Right));
        assert!(board.take_jump(Side::Left));
        assert!(!board.take_jump(Side::Left));

        board.note_jump(Side::Right);
        board.reset();
        assert!(!board.take_jump(Side::Right));
    }

    #[test]
    fn test_reset_keeps_policy() {
        let mut board = Scoreboard::new(ScoringPolicy::Rally);
        board.register_contact(Side::Left, hit(true));
        board.reset();
        assert_eq!(board.score, 0);
        assert_eq!(board.policy, ScoringPolicy::Rally);
        // Contact latch was dropped, so a new contact scores again
        assert!(matches!(
            board.register_contact(Side::Left, hit(false)),
            Some(ContactOutcome::Scored { .. })
        ));
    }
}
