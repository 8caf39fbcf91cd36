//! Whack-the-Mole data structures and tuning.

use crate::core::{
    Anchor, AssetSlot, Entity, FixedStep, GameConfig, ParamSpec, Rgb, Session, Spawner, Vec2,
};

pub const WIDTH: f64 = 640.0;
pub const HEIGHT: f64 = 360.0;

pub const COLS: usize = 3;
pub const ROWS: usize = 3;
/// Centre of the top-left hole.
pub const HOLE_ORIGIN: Vec2 = Vec2::new(100.0, 100.0);
pub const HOLE_SPACING: f64 = 120.0;
pub const MOLE_SIZE: f64 = 60.0;
/// Pointer hits count within this distance of a mole's centre.
pub const HIT_RADIUS: f64 = 30.0;

pub const COMBO_WINDOW_MS: u64 = 2000;
pub const COMBO_BONUS: f64 = 0.5;
/// Lost for every normal or golden mole that ducks back unhit.
pub const MISS_PENALTY: u32 = 5;

pub const DIFFICULTY_EVERY_MS: u64 = 10_000;
pub const DIFFICULTY_STEP: f64 = 0.5;
pub const MIN_SPAWN_MS: f64 = 500.0;
pub const SPAWN_EASE_MS: f64 = 200.0;
/// Above this difficulty a spawn may raise two moles at once.
pub const DOUBLE_SPAWN_DIFFICULTY: f64 = 2.0;
pub const DOUBLE_SPAWN_CHANCE: f64 = 0.3;
/// `moleSpeed` at which visibility times are used unscaled.
pub const REFERENCE_SPEED: f64 = 1.5;
pub const HAMMER_MS: f64 = 150.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        id: "gameTime",
        name: "Game Time (s)",
        min: 30.0,
        max: 120.0,
        step: 15.0,
        default: 60.0,
    },
    ParamSpec {
        id: "moleSpeed",
        name: "Mole Speed",
        min: 0.5,
        max: 3.0,
        step: 0.25,
        default: 1.5,
    },
    ParamSpec {
        id: "spawnRate",
        name: "Spawn Rate",
        min: 500.0,
        max: 3000.0,
        step: 250.0,
        default: 1500.0,
    },
    ParamSpec {
        id: "difficulty",
        name: "Difficulty",
        min: 1.0,
        max: 5.0,
        step: 1.0,
        default: 1.0,
    },
];

pub const SLOTS: &[AssetSlot] = &[
    AssetSlot {
        id: "background",
        name: "Background",
        width: 640,
        height: 360,
    },
    AssetSlot {
        id: "mole",
        name: "Mole",
        width: 60,
        height: 60,
    },
    AssetSlot {
        id: "hole",
        name: "Hole",
        width: 80,
        height: 40,
    },
    AssetSlot {
        id: "hammer",
        name: "Hammer",
        width: 40,
        height: 60,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoleKind {
    Normal,
    Golden,
    /// Costs points when hit.
    Bomb,
}

impl MoleKind {
    /// Points for a hit, or the penalty for a bomb.
    pub fn points(&self) -> u32 {
        match self {
            Self::Normal => 10,
            Self::Golden => 50,
            Self::Bomb => 20,
        }
    }

    /// How long the mole stays up at `difficulty` and reference speed.
    pub fn visible_ms(&self, difficulty: f64) -> f64 {
        match self {
            Self::Normal => (2000.0 - difficulty * 200.0).max(800.0),
            Self::Golden => (1500.0 - difficulty * 100.0).max(1000.0),
            Self::Bomb => (2000.0 - difficulty * 150.0).max(1200.0),
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Normal => Rgb::hex(0x8B4513),
            Self::Golden => Rgb::hex(0xFFD700),
            Self::Bomb => Rgb::hex(0x2F2F2F),
        }
    }
}

/// A fixed grid slot. The mole entity sits at the hole centre and is shown
/// through `flags.visible`.
#[derive(Debug, Clone)]
pub struct Hole {
    pub mole: Entity<MoleKind>,
    pub shown_ms: f64,
    pub visible_for_ms: f64,
}

impl Hole {
    pub fn new(index: usize) -> Self {
        let center = Vec2::new(
            HOLE_ORIGIN.x + (index % COLS) as f64 * HOLE_SPACING,
            HOLE_ORIGIN.y + (index / COLS) as f64 * HOLE_SPACING,
        );
        let mut mole = Entity::new(
            MoleKind::Normal,
            center,
            Vec2::new(MOLE_SIZE, MOLE_SIZE),
            Anchor::Center,
        );
        mole.flags.visible = false;
        Self {
            mole,
            shown_ms: 0.0,
            visible_for_ms: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.mole.pos
    }

    pub fn is_up(&self) -> bool {
        self.mole.flags.visible
    }

    pub fn show(&mut self, kind: MoleKind, visible_for_ms: f64) {
        self.mole.kind = kind;
        self.mole.flags.visible = true;
        self.shown_ms = 0.0;
        self.visible_for_ms = visible_for_ms;
    }

    pub fn hide(&mut self) {
        self.mole.flags.visible = false;
        self.shown_ms = 0.0;
    }

    /// Circular hit test against a visible mole.
    pub fn is_hit(&self, point: Vec2) -> bool {
        self.is_up() && self.center().distance(point) <= HIT_RADIUS
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub game_time_ms: f64,
    pub mole_speed: f64,
    pub spawn_rate_ms: f64,
    pub difficulty: f64,
}

impl Tuning {
    pub fn from_config(config: &GameConfig) -> Self {
        let get = |id| crate::core::config::param(config, PARAMS, id);
        Self {
            game_time_ms: get("gameTime") * 1000.0,
            mole_speed: get("moleSpeed"),
            spawn_rate_ms: get("spawnRate"),
            difficulty: get("difficulty"),
        }
    }

    /// Multiplier applied to visibility times.
    pub fn visibility_scale(&self) -> f64 {
        REFERENCE_SPEED / self.mole_speed
    }
}

#[derive(Debug, Clone)]
pub struct MoleGame {
    pub session: Session,
    pub tuning: Tuning,
    pub holes: Vec<Hole>,
    pub spawner: Spawner,
    pub time_left_ms: f64,
    /// Simulated play time, advanced per tick.
    pub play_ms: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub last_hit_ms: u64,
    pub missed: u32,
    /// Last swing position and how long to keep drawing it.
    pub hammer: Option<(Vec2, f64)>,
    pub clock: FixedStep,
}
