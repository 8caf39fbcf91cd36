//! A running game: key mapping, frame stepping and drawing.

use super::canvas::TerminalCanvas;
use super::game_common::{
    create_game_layout, format_score, render_game_over_banner, render_info_panel_frame,
    render_status_bar, state_status,
};
use arcade::core::{
    ArcadeConfig, AssetLoader, AssetStore, Controls, Direction, GameConfig, GameState, Outcome,
};
use arcade::games::mole::Hole;
use arcade::games::{Game, GameEvent, GameKind};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rand::RngCore;

/// How long an event message stays in the info panel.
const MESSAGE_MS: u64 = 1500;

/// What the app should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    None,
    BackToMenu,
    /// Re-read the config file and apply it to the running game.
    ReloadConfig,
    Quit,
}

pub struct GameScene {
    pub kind: GameKind,
    pub game: Box<dyn Game>,
    pub assets: AssetStore,
    loader: Option<AssetLoader>,
    pub controls: Controls,
    message: Option<(String, u64)>,
    last_outcome: Option<Outcome>,
}

impl GameScene {
    pub fn new(kind: GameKind, config: &ArcadeConfig, rng: &mut dyn RngCore) -> Self {
        let game_config = config.game(kind.id());
        Self {
            kind,
            game: kind.create(&game_config, rng),
            assets: AssetStore::default(),
            loader: sprite_loader(&game_config),
            controls: Controls::default(),
            message: None,
            last_outcome: None,
        }
    }

    /// Apply a freshly read config between frames. Parameters take effect on
    /// the running session; sprites are reloaded in the background.
    pub fn reload_config(&mut self, config: &ArcadeConfig) {
        let game_config = config.game(self.kind.id());
        self.game.apply_config(&game_config);
        self.assets = AssetStore::default();
        self.loader = sprite_loader(&game_config);
        self.show("Config reloaded");
    }

    /// Translate a key into control flags or a session command.
    pub fn handle_key(&mut self, code: KeyCode, rng: &mut dyn RngCore) -> SceneAction {
        let state = self.game.session().state;
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return SceneAction::Quit,
            KeyCode::Esc => return SceneAction::BackToMenu,
            KeyCode::Char('c') | KeyCode::Char('C') => return SceneAction::ReloadConfig,
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.game.toggle_pause();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.game.restart(rng) {
                    self.reset_frame_state();
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if self.game.next_level(rng) {
                    self.reset_frame_state();
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                if self.game.hint() {
                    self.show("Hint shown");
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter if state == GameState::Menu => {
                self.game.start();
            }
            KeyCode::Char(' ') => {
                self.controls.jump = true;
                self.controls.action = true;
            }
            KeyCode::Enter => self.controls.action = true,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                self.controls.press(Direction::Up)
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.controls.press(Direction::Down);
                if self.kind == GameKind::SpeedRunner {
                    self.controls.slide = !self.controls.slide;
                }
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.controls.press(Direction::Left)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.controls.press(Direction::Right)
            }
            KeyCode::Char(c @ '1'..='9') if self.kind == GameKind::WhackTheMole => {
                let index = c as usize - '1' as usize;
                self.controls.pointer = Some(Hole::new(index).center());
            }
            _ => {}
        }
        SceneAction::None
    }

    fn reset_frame_state(&mut self) {
        self.controls = Controls::default();
        self.last_outcome = None;
    }

    fn show(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), MESSAGE_MS));
    }

    /// Poll sprite loads, step the game and collect its events.
    pub fn update(&mut self, dt_ms: u64, rng: &mut dyn RngCore) -> Vec<GameEvent> {
        if let Some(loader) = self.loader.as_mut() {
            loader.poll(&mut self.assets);
            if loader.pending() == 0 {
                self.loader = None;
            }
        }

        let events = self.game.step(dt_ms, &mut self.controls, rng);
        self.controls.end_frame();

        if let Some((_, left)) = self.message.as_mut() {
            *left = left.saturating_sub(dt_ms);
            if *left == 0 {
                self.message = None;
            }
        }
        for event in &events {
            match event {
                GameEvent::SessionEnded(report) => self.last_outcome = Some(report.outcome),
                GameEvent::LevelComplete { .. } => self.last_outcome = Some(Outcome::LevelComplete),
                _ => {}
            }
            if let Some(text) = event_message(event) {
                self.show(text);
            }
        }
        events
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, best: u32) {
        let title = format!(" {} ", self.kind.name());
        let layout = create_game_layout(frame, area, &title, Color::Cyan, 24);

        let mut canvas = TerminalCanvas::new(
            layout.content.width,
            layout.content.height,
            self.game.world_size(),
        );
        self.game.render(&mut canvas, &self.assets);
        frame.render_widget(Paragraph::new(canvas.to_lines()), layout.content);

        let state = self.game.session().state;
        let (status, color) = state_status(state);
        render_status_bar(frame, layout.status_bar, status, color, controls_for(self.kind, state));

        self.draw_info(frame, layout.info_panel, best);

        if let (true, Some(outcome)) = (state.is_terminal(), self.last_outcome) {
            let score = self.game.session().score;
            let (title, hint) = match outcome {
                Outcome::GameOver => ("GAME OVER", "[R] Restart  [Esc] Menu"),
                Outcome::LevelComplete => ("LEVEL COMPLETE", "[N] Next level  [R] Restart"),
            };
            let message = if score > 0 && score >= best {
                format!("New best: {}", score)
            } else {
                format!("Score: {}", score)
            };
            render_game_over_banner(frame, layout.content, outcome, title, &message, hint);
        }
    }

    fn draw_info(&self, frame: &mut Frame, area: Rect, best: u32) {
        let inner = render_info_panel_frame(frame, area);
        let session = self.game.session();
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(format_score(session.score), value.add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("Best:  ", label),
                Span::styled(format_score(best.max(session.best_score)), value),
            ]),
            Line::from(vec![
                Span::styled("Level: ", label),
                Span::styled(format!("{:.1}", session.difficulty), value),
            ]),
            Line::from(vec![
                Span::styled("Time:  ", label),
                Span::styled(format!("{}s", session.elapsed_ms / 1000), value),
            ]),
            Line::from(""),
        ];
        for spec in self.game.param_specs() {
            lines.push(Line::from(Span::styled(spec.name, label)));
        }
        if self.loader.is_some() {
            lines.push(Line::from(Span::styled(
                "Loading sprites...",
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some((text, _)) = &self.message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                text.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Short info-panel text for notable events.
fn sprite_loader(config: &GameConfig) -> Option<AssetLoader> {
    if config.assets.is_empty() {
        None
    } else {
        Some(AssetLoader::spawn(config.assets.clone()))
    }
}

pub fn event_message(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Cascade { level, .. } if *level > 1 => Some(format!("Cascade x{}!", level)),
        GameEvent::PowerUp(slot) => Some(format!("Power-up: {}", slot.replace('_', " "))),
        GameEvent::Milestone(metres) => Some(format!("{} m!", metres)),
        GameEvent::Penalty(points) => Some(format!("-{}", points)),
        GameEvent::LevelComplete { level, .. } => Some(format!("Level {} complete!", level)),
        _ => None,
    }
}

fn controls_for(kind: GameKind, state: GameState) -> &'static [(&'static str, &'static str)] {
    match state {
        GameState::Menu => &[("[Space]", "Start"), ("[Esc]", "Menu"), ("[Q]", "Quit")],
        GameState::Paused => &[("[P]", "Resume"), ("[C]", "Reload config"), ("[Esc]", "Menu")],
        GameState::GameOver => &[("[R]", "Restart"), ("[Esc]", "Menu")],
        GameState::LevelComplete => &[("[N]", "Next"), ("[R]", "Restart"), ("[Esc]", "Menu")],
        GameState::Playing => match kind {
            GameKind::CrossyRoad => &[("[Arrows]", "Hop"), ("[P]", "Pause")],
            GameKind::FlappyBird => &[("[Space]", "Flap"), ("[P]", "Pause")],
            GameKind::Match3 => &[
                ("[Arrows]", "Move"),
                ("[Space]", "Select"),
                ("[H]", "Hint"),
                ("[P]", "Pause"),
            ],
            GameKind::SpeedRunner => &[("[Space]", "Jump"), ("[Down]", "Slide"), ("[P]", "Pause")],
            GameKind::WhackTheMole => &[("[1-9]", "Whack"), ("[P]", "Pause")],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade::core::{DrawList, SessionReport};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scene(kind: GameKind) -> (GameScene, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let scene = GameScene::new(kind, &ArcadeConfig::default(), &mut rng);
        (scene, rng)
    }

    #[test]
    fn test_space_starts_then_flaps() {
        let (mut s, mut rng) = scene(GameKind::FlappyBird);
        s.handle_key(KeyCode::Char(' '), &mut rng);
        assert!(s.game.session().is_playing());
        assert!(!s.controls.jump);
        s.handle_key(KeyCode::Char(' '), &mut rng);
        assert!(s.controls.jump && s.controls.action);
    }

    #[test]
    fn test_down_toggles_slide_only_for_runner() {
        let (mut runner, mut rng) = scene(GameKind::SpeedRunner);
        runner.handle_key(KeyCode::Down, &mut rng);
        assert!(runner.controls.slide);
        runner.handle_key(KeyCode::Down, &mut rng);
        assert!(!runner.controls.slide);

        let (mut crossy, mut rng) = scene(GameKind::CrossyRoad);
        crossy.handle_key(KeyCode::Down, &mut rng);
        assert!(!crossy.controls.slide);
        assert!(crossy.controls.down);
    }

    #[test]
    fn test_number_keys_point_at_holes() {
        let (mut s, mut rng) = scene(GameKind::WhackTheMole);
        s.handle_key(KeyCode::Char('5'), &mut rng);
        assert_eq!(s.controls.pointer, Some(Hole::new(4).center()));

        let (mut other, mut rng) = scene(GameKind::Match3);
        other.handle_key(KeyCode::Char('5'), &mut rng);
        assert_eq!(other.controls.pointer, None);
    }

    #[test]
    fn test_escape_and_quit() {
        let (mut s, mut rng) = scene(GameKind::Match3);
        assert_eq!(s.handle_key(KeyCode::Esc, &mut rng), SceneAction::BackToMenu);
        assert_eq!(s.handle_key(KeyCode::Char('c'), &mut rng), SceneAction::ReloadConfig);
        assert_eq!(s.handle_key(KeyCode::Char('q'), &mut rng), SceneAction::Quit);
        assert_eq!(s.handle_key(KeyCode::Char('x'), &mut rng), SceneAction::None);
    }

    #[test]
    fn test_update_clears_edge_flags() {
        let (mut s, mut rng) = scene(GameKind::SpeedRunner);
        s.game.start();
        s.handle_key(KeyCode::Up, &mut rng);
        s.handle_key(KeyCode::Down, &mut rng);
        s.update(16, &mut rng);
        assert!(!s.controls.up);
        assert!(s.controls.slide);
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(
            event_message(&GameEvent::Cascade {
                level: 2,
                cleared: 3,
                points: 45
            }),
            Some("Cascade x2!".to_string())
        );
        assert_eq!(
            event_message(&GameEvent::Cascade {
                level: 1,
                cleared: 3,
                points: 30
            }),
            None
        );
        assert_eq!(
            event_message(&GameEvent::PowerUp("double_score")),
            Some("Power-up: double score".to_string())
        );
        let report = SessionReport {
            game: "flappy-bird",
            score: 3,
            outcome: Outcome::GameOver,
            duration_ms: 10,
        };
        assert_eq!(event_message(&GameEvent::SessionEnded(report)), None);
        assert_eq!(
            event_message(&GameEvent::LevelComplete {
                level: 2,
                score: 2050
            }),
            Some("Level 2 complete!".to_string())
        );
    }

    fn snapshot(scene: &GameScene) -> DrawList {
        let mut list = DrawList::default();
        scene.game.render(&mut list, &AssetStore::default());
        list
    }

    #[test]
    fn test_reload_applies_params_to_running_game() {
        let (mut plain, mut rng_a) = scene(GameKind::FlappyBird);
        let (mut heavy, mut rng_b) = scene(GameKind::FlappyBird);
        plain.game.start();
        heavy.game.start();
        plain.update(160, &mut rng_a);
        heavy.update(160, &mut rng_b);
        assert_eq!(snapshot(&plain).calls, snapshot(&heavy).calls);

        let mut config = ArcadeConfig::default();
        config.games.insert(
            GameKind::FlappyBird.id().to_string(),
            GameConfig::default().with_param("gravity", 1.2),
        );
        heavy.reload_config(&config);
        assert!(heavy.game.session().is_playing());
        assert_eq!(heavy.message.as_ref().map(|(m, _)| m.as_str()), Some("Config reloaded"));

        plain.update(160, &mut rng_a);
        heavy.update(160, &mut rng_b);
        assert_ne!(snapshot(&plain).calls, snapshot(&heavy).calls);
    }
}
