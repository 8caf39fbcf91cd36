//! Session state machine, scoring and the end-of-session report.

use log::info;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

impl GameState {
    /// GameOver and LevelComplete only leave through an explicit restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver | Self::LevelComplete)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    GameOver,
    LevelComplete,
}

/// Final result handed to the score callback once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub game: &'static str,
    pub score: u32,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

/// Receives the terminal score of each session.
pub trait ScoreReporter {
    fn report(&mut self, report: &SessionReport);
}

impl<F: FnMut(&SessionReport)> ScoreReporter for F {
    fn report(&mut self, report: &SessionReport) {
        self(report)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub game: &'static str,
    pub state: GameState,
    pub score: u32,
    pub best_score: u32,
    /// Non-decreasing over a session; reset by `restart`.
    pub difficulty: f64,
    pub base_difficulty: f64,
    pub elapsed_ms: u64,
    /// Set once the terminal report has been produced.
    pub reported: bool,
}

impl Session {
    pub fn new(game: &'static str, base_difficulty: f64) -> Self {
        Self {
            game,
            state: GameState::Menu,
            score: 0,
            best_score: 0,
            difficulty: base_difficulty,
            base_difficulty,
            elapsed_ms: 0,
            reported: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Menu -> Playing.
    pub fn start(&mut self) -> bool {
        if self.state != GameState::Menu {
            return false;
        }
        self.state = GameState::Playing;
        info!("{}: session started", self.game);
        true
    }

    /// Playing <-> Paused. Ignored in any other state.
    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            _ => return false,
        };
        true
    }

    /// Playing -> GameOver / LevelComplete. Returns the report the first time
    /// the run ends in game over; later calls return `None`.
    ///
    /// A completed level pauses the run without reporting. The score carries
    /// into the next level and is reported once, when the run ends.
    pub fn finish(&mut self, outcome: Outcome) -> Option<SessionReport> {
        if self.state != GameState::Playing {
            return None;
        }
        self.best_score = self.best_score.max(self.score);
        if outcome == Outcome::LevelComplete {
            self.state = GameState::LevelComplete;
            info!("{}: level complete with score {}", self.game, self.score);
            return None;
        }
        self.state = GameState::GameOver;
        if self.reported {
            return None;
        }
        self.reported = true;
        info!(
            "{}: session ended ({:?}) with score {}",
            self.game, outcome, self.score
        );
        Some(SessionReport {
            game: self.game,
            score: self.score,
            outcome,
            duration_ms: self.elapsed_ms,
        })
    }

    /// GameOver / LevelComplete -> Playing with a fresh score.
    pub fn restart(&mut self) -> bool {
        if !self.state.is_terminal() {
            return false;
        }
        self.state = GameState::Playing;
        self.score = 0;
        self.difficulty = self.base_difficulty;
        self.elapsed_ms = 0;
        self.reported = false;
        info!("{}: session restarted", self.game);
        true
    }

    /// LevelComplete -> Playing, keeping the score (next level).
    pub fn continue_level(&mut self) -> bool {
        if self.state != GameState::LevelComplete {
            return false;
        }
        self.state = GameState::Playing;
        true
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// The only way the score goes down. Saturates at zero.
    pub fn apply_penalty(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }

    /// Difficulty only ever rises within a session.
    pub fn raise_difficulty(&mut self, value: f64) {
        if value > self.difficulty {
            self.difficulty = value;
        }
    }

    pub fn tick_clock(&mut self, dt_ms: u64) {
        self.elapsed_ms += dt_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> Session {
        let mut s = Session::new("test", 1.0);
        assert!(s.start());
        s
    }

    #[test]
    fn test_new_session_in_menu() {
        let s = Session::new("test", 1.0);
        assert_eq!(s.state, GameState::Menu);
        assert_eq!(s.score, 0);
        assert!(!s.reported);
    }

    #[test]
    fn test_start_only_from_menu() {
        let mut s = playing();
        assert!(!s.start());
        assert_eq!(s.state, GameState::Playing);
    }

    #[test]
    fn test_pause_cycle() {
        let mut s = playing();
        assert!(s.toggle_pause());
        assert_eq!(s.state, GameState::Paused);
        assert!(s.toggle_pause());
        assert_eq!(s.state, GameState::Playing);
    }

    #[test]
    fn test_pause_ignored_in_menu_and_game_over() {
        let mut s = Session::new("test", 1.0);
        assert!(!s.toggle_pause());
        s.start();
        s.finish(Outcome::GameOver);
        assert!(!s.toggle_pause());
        assert_eq!(s.state, GameState::GameOver);
    }

    #[test]
    fn test_finish_reports_once() {
        let mut s = playing();
        s.add_score(12);
        let report = s.finish(Outcome::GameOver).expect("first finish reports");
        assert_eq!(report.score, 12);
        assert_eq!(report.outcome, Outcome::GameOver);
        assert!(s.finish(Outcome::GameOver).is_none());
        assert_eq!(s.best_score, 12);
    }

    #[test]
    fn test_cannot_finish_from_paused_or_menu() {
        let mut s = Session::new("test", 1.0);
        assert!(s.finish(Outcome::GameOver).is_none());
        s.start();
        s.toggle_pause();
        assert!(s.finish(Outcome::GameOver).is_none());
        assert_eq!(s.state, GameState::Paused);
    }

    #[test]
    fn test_game_over_is_terminal_until_restart() {
        let mut s = playing();
        s.finish(Outcome::GameOver);
        assert!(!s.start());
        assert!(!s.continue_level());
        assert_eq!(s.state, GameState::GameOver);
        assert!(s.restart());
        assert_eq!(s.state, GameState::Playing);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_restart_rejected_while_playing() {
        let mut s = playing();
        s.add_score(5);
        assert!(!s.restart());
        assert_eq!(s.score, 5);
    }

    #[test]
    fn test_continue_level_keeps_score() {
        let mut s = playing();
        s.add_score(1000);
        assert!(s.finish(Outcome::LevelComplete).is_none());
        assert_eq!(s.state, GameState::LevelComplete);
        assert!(s.continue_level());
        assert_eq!(s.score, 1000);
        assert_eq!(s.state, GameState::Playing);
    }

    #[test]
    fn test_run_across_levels_reports_once() {
        let mut s = playing();
        s.add_score(1010);
        assert!(s.finish(Outcome::LevelComplete).is_none());
        assert!(s.continue_level());
        s.add_score(30);
        let report = s.finish(Outcome::GameOver).expect("run end reports");
        assert_eq!(report.score, 1040);
        assert_eq!(report.outcome, Outcome::GameOver);
        assert!(s.finish(Outcome::GameOver).is_none());
    }

    #[test]
    fn test_restart_after_level_complete_reports_new_run() {
        let mut s = playing();
        s.add_score(500);
        s.finish(Outcome::LevelComplete);
        assert!(s.restart());
        s.add_score(8);
        let report = s.finish(Outcome::GameOver).expect("new run reports");
        assert_eq!(report.score, 8);
    }

    #[test]
    fn test_penalty_saturates() {
        let mut s = playing();
        s.add_score(3);
        s.apply_penalty(20);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_difficulty_never_decreases() {
        let mut s = playing();
        s.raise_difficulty(2.5);
        s.raise_difficulty(1.5);
        assert_eq!(s.difficulty, 2.5);
    }

    #[test]
    fn test_closure_reporter() {
        let mut seen = Vec::new();
        {
            let mut reporter = |r: &SessionReport| seen.push(r.score);
            let mut s = playing();
            s.add_score(7);
            if let Some(report) = s.finish(Outcome::GameOver) {
                reporter.report(&report);
            }
        }
        assert_eq!(seen, vec![7]);
    }
}
