//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one 1/60 s step. Wall-clock time is
//! only consulted for the session clock and the ball's reset window.

use glam::Vec2;

use super::character::Side;
use super::collision::test_collision;
use super::scoring::ContactOutcome;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{DEFAULT_GRAVITY, DEFAULT_SPEED_SETTING};

/// Inputs sampled once per tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Speed control value; `None` keeps the ball's current speed
    pub speed: Option<f32>,
    pub gravity: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            speed: Some(DEFAULT_SPEED_SETTING as f32),
            gravity: DEFAULT_GRAVITY,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.stats.update_session_time(now_ms);

    // Ball
    state.ball.release_if_due(now_ms);
    if state.ball.advance(&state.playfield, input.speed) {
        // Direction already flipped: heading right means it hit the left wall
        let (side, wall_x) = if state.ball.direction > 0.0 {
            (Side::Left, 0.0)
        } else {
            (Side::Right, state.playfield.width)
        };
        state.scoreboard.note_wall_bounce(side);
        events.push(GameEvent::WallBounce {
            side,
            point: Vec2::new(wall_x, state.ball.center().y),
        });
    }

    // Characters
    let field = state.playfield;
    state.left.update(&field, input.gravity);
    state.right.update(&field, input.gravity);

    // Collisions, left before right
    for side in [Side::Left, Side::Right] {
        let result = test_collision(state.character(side), &state.ball);
        match state.scoreboard.register_contact(side, result) {
            Some(ContactOutcome::Scored { points, perfect }) => {
                // A grounded character's contact scores but is no jump
                if state.scoreboard.take_jump(side) {
                    state.stats.judge_jump(perfect);
                }
                log::debug!("{} hit for {} (perfect: {})", side.as_str(), points, perfect);
                events.push(GameEvent::Hit {
                    side,
                    perfect,
                    points,
                    point: state.ball.center(),
                });
            }
            Some(ContactOutcome::Fatal) => {
                if state.scoreboard.take_jump(side) {
                    state.stats.judge_jump(false);
                }
                state.phase = GamePhase::GameOver;
                log::info!(
                    "Game over: {} character hit the ball, score {}",
                    side.as_str(),
                    state.score()
                );
                events.push(GameEvent::GameOver { side });
                return events;
            }
            Some(ContactOutcome::Ongoing) | None => {}
        }
    }

    // Clean clearances
    let ball_box = state.ball.bounds();
    for side in [Side::Left, Side::Right] {
        let body = state.character(side).bounds();
        let in_column = ball_box.min.x < body.max().x && ball_box.max().x > body.min.x;
        if state.scoreboard.take_clearance(side, in_column) {
            if state.scoreboard.take_jump(side) {
                state.stats.judge_jump(true);
            }
            events.push(GameEvent::Cleared { side });
        }
    }

    // Jumps that landed without meeting the ball
    for side in [Side::Left, Side::Right] {
        if !state.character(side).is_jumping && state.scoreboard.take_jump(side) {
            state.stats.judge_jump(false);
        }
    }

    // Cycle bonus
    if state.scoreboard.check_cycle(&state.ball, &state.playfield) {
        events.push(GameEvent::CycleBonus {
            points: crate::consts::CYCLE_BONUS_POINTS,
        });
    }

    events
}
