//! Session state machine and frame driver
//!
//! `GameController` owns the simulation, the decorative effects and the two
//! collaborators (audio, HUD). The host calls [`GameController::frame`] once
//! per display frame; the controller turns wall-clock time into fixed ticks
//! and reports whether it wants another frame.

use std::fmt;

use glam::Vec2;

use crate::audio::{AudioFeedback, AudioGuard};
use crate::consts::*;
use crate::effects::{ParticleKind, VisualEffects};
use crate::hud::{Hud, START_LABEL, STOP_LABEL};
use crate::renderer::{RenderError, Surface, render_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Playfield, Side, StatsSnapshot, TickInput, tick};

/// What the host loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame
    Continue,
    /// Session is not running; stop scheduling
    Halt,
}

/// A frame that could not complete. The controller has already stopped.
#[derive(Debug)]
pub enum FrameError {
    /// An entity position or velocity became NaN or infinite
    NonFiniteState,
    Render(RenderError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::NonFiniteState => write!(f, "simulation state is not finite"),
            FrameError::Render(e) => write!(f, "render failed: {e}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Render(e) => Some(e),
            FrameError::NonFiniteState => None,
        }
    }
}

impl From<RenderError> for FrameError {
    fn from(e: RenderError) -> Self {
        FrameError::Render(e)
    }
}

pub struct GameController<A: AudioFeedback, H: Hud> {
    state: GameState,
    effects: VisualEffects,
    audio: AudioGuard<A>,
    hud: H,
    settings: Settings,
    accumulator: f32,
    last_frame_ms: Option<f64>,
}

impl<A: AudioFeedback, H: Hud> GameController<A, H> {
    pub fn new(width: f32, height: f32, mut settings: Settings, audio: A, mut hud: H, seed: u64) -> Self {
        settings.validate();
        let field = Playfield::new(width, height);

        hud.set_button_label(START_LABEL);
        hud.show_score(0);

        Self {
            state: GameState::new(field, settings.scoring),
            effects: VisualEffects::new(field, settings.effects_config(), seed),
            audio: AudioGuard::new(audio),
            hud,
            settings,
            accumulator: 0.0,
            last_frame_ms: None,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.state.stats.snapshot()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_running() { STOP_LABEL } else { START_LABEL }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn effects(&self) -> &VisualEffects {
        &self.effects
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &AudioGuard<A> {
        &self.audio
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    // === Session transitions ===

    /// Begin a fresh session. No-op while already running.
    pub fn start(&mut self, now_ms: f64) {
        if self.is_running() {
            return;
        }

        self.state.stats.reset(now_ms);
        self.effects.clear();
        self.state.scoreboard.policy = self.settings.scoring;
        self.state.reset_play(now_ms);
        if self.settings.hemisync {
            self.audio.start_ambient();
        }

        self.accumulator = 0.0;
        self.last_frame_ms = None;
        self.hud.set_button_label(STOP_LABEL);
        self.hud.show_score(0);
        log::info!(
            "Session started ({} scoring, speed {})",
            self.settings.scoring.as_str(),
            self.settings.speed
        );
    }

    /// End the running session and return to idle
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state.phase = GamePhase::Idle;
        self.effects.clear();
        self.finish_session();
        log::info!("Session stopped, score {}", self.score());
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now_ms);
        }
    }

    fn enter_game_over(&mut self) {
        self.audio.play_end_cue();
        self.finish_session();
    }

    /// Shared exit path for stop and game over
    fn finish_session(&mut self) {
        self.audio.stop_ambient();
        self.hud.set_button_label(START_LABEL);
        self.hud.show_score(self.score());
        self.hud.show_stats(&self.state.stats.snapshot());
        self.hud.session_ended(self.score());
    }

    // === Per-frame ===

    /// Advance by the wall-clock time since the previous frame, then render.
    ///
    /// On error the session has been stopped and the host should not
    /// schedule further frames.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> Result<FrameStatus, FrameError> {
        if self.is_running() {
            let dt = match self.last_frame_ms {
                Some(last) => ((now_ms - last) / 1000.0) as f32,
                None => SIM_DT,
            };
            self.last_frame_ms = Some(now_ms);
            self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && self.is_running() {
                self.step(now_ms);
                self.accumulator -= SIM_DT;
                substeps += 1;

                if !self.state.is_finite() {
                    return Err(self.fault(FrameError::NonFiniteState));
                }
            }
        }

        if let Err(e) = self.render(surface) {
            return Err(self.fault(FrameError::Render(e)));
        }

        Ok(if self.is_running() {
            FrameStatus::Continue
        } else {
            FrameStatus::Halt
        })
    }

    fn fault(&mut self, error: FrameError) -> FrameError {
        log::error!("Frame failed, stopping: {error}");
        self.stop();
        error
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if !self.is_running() {
            return Vec::new();
        }

        let input = TickInput {
            speed: Some(self.settings.speed as f32),
            gravity: self.settings.gravity,
        };
        let events = tick(&mut self.state, &input, now_ms);

        self.effects.add_trail_point(self.state.ball.center());
        for event in &events {
            match *event {
                GameEvent::WallBounce { side, point } => {
                    log::debug!("Bounce at {} wall", side.as_str());
                    self.effects.add_particle(point, ParticleKind::Trail);
                }
                GameEvent::Hit { point, .. } => {
                    self.effects.create_collision_effect(point);
                    self.audio.play_hit_cue();
                }
                GameEvent::CycleBonus { points } => {
                    log::debug!("Cycle complete, +{points}");
                }
                GameEvent::Cleared { side } => {
                    log::debug!("{} side cleared the ball", side.as_str());
                }
                GameEvent::GameOver { .. } => {}
            }
        }
        self.effects.update();
        self.hud.show_score(self.score());

        if self.state.phase == GamePhase::GameOver {
            self.enter_game_over();
        }

        events
    }

    /// Draw the current state and present it
    pub fn render(&mut self, surface: &mut dyn Surface) -> Result<(), RenderError> {
        render_scene(surface, &self.state, &self.effects);
        surface.present()
    }

    // === Inputs ===

    /// Re-lay out for a new playfield size. Safe to call repeatedly.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
        self.effects.resize(self.state.playfield);
    }

    /// Jump request from the host. Only honoured while running.
    pub fn jump(&mut self, side: Side) -> bool {
        if !self.is_running() {
            return false;
        }

        if !self.state.jump(side, self.settings.jump_force) {
            return false;
        }
        let feet: Vec2 = self.state.character(side).feet();

        self.audio.play_hit_cue();
        self.effects.add_particle(feet, ParticleKind::Jump);
        true
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.settings.speed = speed;
        self.audio.set_ambient_separation(speed);
    }

    pub fn set_hemisync(&mut self, enabled: bool) {
        self.settings.hemisync = enabled;
        if self.is_running() {
            if enabled {
                self.audio.start_ambient();
            } else {
                self.audio.stop_ambient();
            }
        }
    }
}
