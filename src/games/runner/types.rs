//! Speed Runner data structures and tuning.

use crate::core::{
    AssetSlot, Entity, FixedStep, GameConfig, ParamSpec, Rgb, Session, Spawner, Vec2,
};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 400.0;
pub const GROUND_Y: f64 = 380.0;

pub const RUNNER_X: f64 = 50.0;
pub const RUNNER_SIZE: Vec2 = Vec2::new(30.0, 40.0);
pub const SLIDE_SIZE: Vec2 = Vec2::new(40.0, 20.0);
pub const MAX_SLIDE_MS: f64 = 1000.0;
pub const TERMINAL_VELOCITY: f64 = 20.0;

/// Speed multiplier gained per 100 m.
pub const SPEED_STEP: f64 = 0.2;
pub const METRES_PER_STEP: f64 = 100.0;
/// Bonus for every 100 m.
pub const DISTANCE_BONUS: u32 = 50;

pub const OBSTACLE_MIN_MS: f64 = 1000.0;
pub const OBSTACLE_MAX_MS: f64 = 2000.0;
pub const OBSTACLE_FLOOR_MS: f64 = 600.0;
pub const OBSTACLE_EASE_MS: f64 = 100.0;
/// Horizontal clearance kept between obstacles at spawn.
pub const OBSTACLE_MIN_GAP: f64 = 150.0;
/// Obstacle boxes shrink by this much on every edge before the hit test.
pub const OBSTACLE_HITBOX_INSET: f64 = 4.0;

pub const POWER_UP_MIN_MS: f64 = 8000.0;
pub const POWER_UP_MAX_MS: f64 = 13000.0;
pub const POWER_UP_SIZE: f64 = 25.0;
pub const POWER_UP_Y: f64 = 350.0;
/// Negative: power-up boxes grow so pickups are forgiving.
pub const POWER_UP_PICKUP_INSET: f64 = -6.0;
pub const SHIELD_MS: f64 = 5000.0;
pub const DOUBLE_SCORE_MS: f64 = 10000.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        id: "gravity",
        name: "Gravity",
        min: 0.4,
        max: 1.2,
        step: 0.1,
        default: 0.8,
    },
    ParamSpec {
        id: "jumpStrength",
        name: "Jump Strength",
        min: 10.0,
        max: 20.0,
        step: 1.0,
        default: 15.0,
    },
    ParamSpec {
        id: "baseSpeed",
        name: "Base Speed",
        min: 2.0,
        max: 6.0,
        step: 0.5,
        default: 3.0,
    },
];

pub const SLOTS: &[AssetSlot] = &[
    AssetSlot {
        id: "background",
        name: "Background",
        width: 800,
        height: 400,
    },
    AssetSlot {
        id: "runner",
        name: "Runner",
        width: 30,
        height: 40,
    },
    AssetSlot {
        id: "ground_obstacle",
        name: "Ground Obstacle",
        width: 30,
        height: 40,
    },
    AssetSlot {
        id: "air_obstacle",
        name: "Air Obstacle",
        width: 40,
        height: 30,
    },
    AssetSlot {
        id: "tall_obstacle",
        name: "Tall Obstacle",
        width: 25,
        height: 80,
    },
    AssetSlot {
        id: "shield",
        name: "Shield",
        width: 25,
        height: 25,
    },
    AssetSlot {
        id: "double_score",
        name: "Double Score",
        width: 25,
        height: 25,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Jump over.
    Ground,
    /// Hangs at head height; slide under or jump over.
    Air,
    /// Jump over.
    Tall,
}

impl ObstacleKind {
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Ground => Vec2::new(30.0, 40.0),
            Self::Air => Vec2::new(40.0, 30.0),
            Self::Tall => Vec2::new(25.0, 80.0),
        }
    }

    /// Top edge of the obstacle.
    pub fn top(&self) -> f64 {
        match self {
            Self::Air => GROUND_Y - 50.0,
            _ => GROUND_Y - self.size().y,
        }
    }

    pub fn slot(&self) -> &'static str {
        match self {
            Self::Ground => "ground_obstacle",
            Self::Air => "air_obstacle",
            Self::Tall => "tall_obstacle",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Ground => Rgb::hex(0x8B4513),
            Self::Air => Rgb::hex(0xFF6B6B),
            Self::Tall => Rgb::hex(0x654321),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    DoubleScore,
}

impl PowerUpKind {
    pub fn duration_ms(&self) -> f64 {
        match self {
            Self::Shield => SHIELD_MS,
            Self::DoubleScore => DOUBLE_SCORE_MS,
        }
    }

    pub fn slot(&self) -> &'static str {
        match self {
            Self::Shield => "shield",
            Self::DoubleScore => "double_score",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Shield => Rgb::hex(0x00BFFF),
            Self::DoubleScore => Rgb::hex(0xFFD700),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub gravity: f64,
    pub jump_strength: f64,
    pub base_speed: f64,
}

impl Tuning {
    pub fn from_config(config: &GameConfig) -> Self {
        let get = |id| crate::core::config::param(config, PARAMS, id);
        Self {
            gravity: get("gravity"),
            jump_strength: get("jumpStrength"),
            base_speed: get("baseSpeed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerGame {
    pub session: Session,
    pub tuning: Tuning,
    pub runner: Entity<()>,
    pub grounded: bool,
    pub sliding: bool,
    /// Slide time left in the current slide.
    pub slide_ms: f64,
    /// Set when a slide ran out while still held; cleared on release.
    pub slide_spent: bool,
    pub obstacles: Vec<Entity<ObstacleKind>>,
    pub power_ups: Vec<Entity<PowerUpKind>>,
    pub obstacle_spawner: Spawner,
    pub power_up_spawner: Spawner,
    /// Metres run.
    pub distance: f64,
    /// Whole metres already turned into points.
    pub metres_scored: u64,
    pub shield_ms: f64,
    pub double_score_ms: f64,
    pub clock: FixedStep,
}
