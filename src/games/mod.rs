//! The five arcade games and the trait the front-end drives them through.

pub mod crossy;
pub mod flappy;
pub mod match3;
pub mod mole;
pub mod runner;

use crate::core::{
    ArcadeConfig, AssetSlot, AssetStore, Controls, GameConfig, Outcome, ParamSpec, RenderSink,
    Session, SessionReport, Vec2,
};
use rand::RngCore;

pub use crossy::CrossyGame;
pub use flappy::FlappyGame;
pub use match3::Match3Game;
pub use mole::MoleGame;
pub use runner::RunnerGame;

/// Something worth telling the front-end about, produced by `Game::step`.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    /// Points added to the score this frame.
    Scored(u32),
    /// Points taken off the score this frame.
    Penalty(u32),
    PowerUp(&'static str),
    Cascade {
        level: u32,
        cleared: usize,
        points: u32,
    },
    Milestone(u32),
    /// A level target was reached. The run goes on with `next_level`, so
    /// nothing is reported yet.
    LevelComplete { level: u32, score: u32 },
    /// Emitted exactly once per run, on the frame it ends in game over.
    SessionEnded(SessionReport),
}

/// Common surface of every game. The front-end calls `step` then `render`
/// once per frame and `apply_config` between frames.
pub trait Game {
    fn kind(&self) -> GameKind;
    fn session(&self) -> &Session;
    fn session_mut(&mut self) -> &mut Session;

    /// World size in pixels; the render sink maps this onto its surface.
    fn world_size(&self) -> Vec2;

    /// Advance by `dt_ms` of wall time. Does nothing unless `Playing`.
    fn step(&mut self, dt_ms: u64, controls: &mut Controls, rng: &mut dyn RngCore)
        -> Vec<GameEvent>;

    fn render(&self, sink: &mut dyn RenderSink, assets: &AssetStore);

    /// Rebuild the world and go back to `Playing` from a terminal state.
    fn restart(&mut self, rng: &mut dyn RngCore) -> bool;

    /// Apply new parameters. Values are clamped to `param_specs`.
    fn apply_config(&mut self, config: &GameConfig);

    fn param_specs(&self) -> &'static [ParamSpec];
    fn asset_slots(&self) -> &'static [AssetSlot];

    fn start(&mut self) -> Vec<GameEvent> {
        if self.session_mut().start() {
            vec![GameEvent::Started]
        } else {
            Vec::new()
        }
    }

    fn toggle_pause(&mut self) -> bool {
        self.session_mut().toggle_pause()
    }

    /// Advance to the next level keeping the score. Only level-based games
    /// support this.
    fn next_level(&mut self, _rng: &mut dyn RngCore) -> bool {
        false
    }

    /// Ask for a hint. Only games with a hint system support this.
    fn hint(&mut self) -> bool {
        false
    }
}

/// End the session and queue the report the first time it ends.
pub(crate) fn end_session(session: &mut Session, outcome: Outcome, events: &mut Vec<GameEvent>) {
    if let Some(report) = session.finish(outcome) {
        events.push(GameEvent::SessionEnded(report));
    }
}

/// Which game, for menus and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    CrossyRoad,
    FlappyBird,
    Match3,
    SpeedRunner,
    WhackTheMole,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::CrossyRoad,
        GameKind::FlappyBird,
        GameKind::Match3,
        GameKind::SpeedRunner,
        GameKind::WhackTheMole,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.id() == id)
    }

    /// Stable id used in the config file, score table and command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::CrossyRoad => "crossy-road",
            Self::FlappyBird => "flappy-bird",
            Self::Match3 => "match-3",
            Self::SpeedRunner => "speed-runner",
            Self::WhackTheMole => "whack-the-mole",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CrossyRoad => "Crossy Road",
            Self::FlappyBird => "Flappy Bird",
            Self::Match3 => "Match-3",
            Self::SpeedRunner => "Speed Runner",
            Self::WhackTheMole => "Whack-the-Mole",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CrossyRoad => "Hop across roads and rivers without getting hit or soaked.",
            Self::FlappyBird => "Flap through the gaps between pipes.",
            Self::Match3 => "Swap gems to line up three or more before moves run out.",
            Self::SpeedRunner => "Jump and slide past obstacles as the run speeds up.",
            Self::WhackTheMole => "Whack moles before they hide. Leave the bombs alone.",
        }
    }

    pub fn param_specs(&self) -> &'static [ParamSpec] {
        match self {
            Self::CrossyRoad => crossy::PARAMS,
            Self::FlappyBird => flappy::PARAMS,
            Self::Match3 => match3::PARAMS,
            Self::SpeedRunner => runner::PARAMS,
            Self::WhackTheMole => mole::PARAMS,
        }
    }

    /// Every parameter at its default value.
    pub fn default_config(&self) -> GameConfig {
        self.param_specs()
            .iter()
            .fold(GameConfig::default(), |config, spec| {
                config.with_param(spec.id, spec.default)
            })
    }

    /// Build a fresh game in the `Menu` state with `config` applied.
    pub fn create(&self, config: &GameConfig, rng: &mut dyn RngCore) -> Box<dyn Game> {
        match self {
            Self::CrossyRoad => Box::new(CrossyGame::new(config, rng)),
            Self::FlappyBird => Box::new(FlappyGame::new(config)),
            Self::Match3 => Box::new(Match3Game::new(config, rng)),
            Self::SpeedRunner => Box::new(RunnerGame::new(config)),
            Self::WhackTheMole => Box::new(MoleGame::new(config)),
        }
    }
}

/// Config listing every game's parameters at their defaults, written on
/// first run so there is a file to edit.
pub fn starter_config() -> ArcadeConfig {
    ArcadeConfig {
        games: GameKind::ALL
            .iter()
            .map(|kind| (kind.id().to_string(), kind.default_config()))
            .collect(),
    }
}
