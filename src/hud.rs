//! Display collaborator: score, session stats, start/stop label, high score
//!
//! The controller calls into [`Hud`] at session boundaries and when the
//! score changes. Missing page elements are skipped silently.

use crate::highscores::HighScore;
use crate::sim::StatsSnapshot;

pub const START_LABEL: &str = "Start Game";
pub const STOP_LABEL: &str = "Stop Game";

pub trait Hud {
    fn show_score(&mut self, score: u64);
    fn show_stats(&mut self, stats: &StatsSnapshot);
    fn set_button_label(&mut self, label: &str);
    /// Session finished with `score`; the HUD owns the persisted best
    fn session_ended(&mut self, score: u64);
}

/// Lines of the session summary panel
pub fn stats_lines(stats: &StatsSnapshot) -> [String; 5] {
    [
        format!("Duration: {}", stats.duration_label()),
        format!("Perfect Jumps: {}", stats.perfect_jumps),
        format!("Total Jumps: {}", stats.total_jumps),
        format!("Longest Streak: {}", stats.longest_streak),
        format!("Success Rate: {}%", stats.success_rate),
    ]
}

/// Logs instead of drawing. Used by the native demo.
#[derive(Debug, Default)]
pub struct LogHud {
    pub high_score: HighScore,
    pub score: u64,
    pub label: String,
}

impl Hud for LogHud {
    fn show_score(&mut self, score: u64) {
        if score != self.score {
            log::debug!("Score: {score}");
        }
        self.score = score;
    }

    fn show_stats(&mut self, stats: &StatsSnapshot) {
        log::info!("Session Statistics");
        for line in stats_lines(stats) {
            log::info!("  {line}");
        }
    }

    fn set_button_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn session_ended(&mut self, score: u64) {
        if self.high_score.submit(score) {
            log::info!("New high score: {score}");
            self.high_score.save();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomHud;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement};

    use super::*;

    /// Writes into the page's `#score`, `#highScore`, `#statsContainer` and
    /// `#startButton` elements
    pub struct DomHud {
        document: Document,
        high_score: HighScore,
        last_score: Option<u64>,
    }

    impl DomHud {
        pub fn new(document: Document, high_score: HighScore) -> Self {
            let hud = Self {
                document,
                high_score,
                last_score: None,
            };
            hud.set_text("highScore", &high_score.best.to_string());
            hud
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl Hud for DomHud {
        fn show_score(&mut self, score: u64) {
            // Called every frame; only touch the DOM on change
            if self.last_score != Some(score) {
                self.set_text("score", &score.to_string());
                self.last_score = Some(score);
            }
        }

        fn show_stats(&mut self, stats: &StatsSnapshot) {
            let Some(container) = self.document.get_element_by_id("statsContainer") else {
                return;
            };
            let body: String = stats_lines(stats)
                .iter()
                .map(|line| format!("<p>{line}</p>"))
                .collect();
            container.set_inner_html(&format!("<h2>Session Statistics</h2>{body}"));
            if let Ok(el) = container.dyn_into::<HtmlElement>() {
                let _ = el.style().set_property("display", "block");
            }
        }

        fn set_button_label(&mut self, label: &str) {
            self.set_text("startButton", label);
        }

        fn session_ended(&mut self, score: u64) {
            if self.high_score.submit(score) {
                self.high_score.save();
                self.set_text("highScore", &score.to_string());
            }
        }
    }
}
