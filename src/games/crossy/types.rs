//! Crossy Road data structures and tuning.

use crate::core::{
    AssetSlot, Entity, FixedStep, GameConfig, ParamSpec, Session, Spawner, Vec2,
};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;
pub const GRID: f64 = 40.0;
pub const PLAYER_SIZE: f64 = 30.0;
pub const START: Vec2 = Vec2::new(400.0, 580.0);

/// Vehicle boxes shrink by this much on every edge before the hit test.
pub const VEHICLE_HITBOX_INSET: f64 = 4.0;
/// Logs support the frog on any overlap.
pub const LOG_SUPPORT_INSET: f64 = 0.0;

/// The camera keeps the frog at least this far above the bottom edge.
pub const CAMERA_MARGIN: f64 = 150.0;
/// Lanes are generated this far above the camera and dropped this far below.
pub const LANE_BUFFER: f64 = 100.0;
/// Traffic is removed once its centre is this far outside the screen.
pub const DESPAWN_MARGIN: f64 = 200.0;
/// Every n-th lane is grass.
pub const SAFE_LANE_EVERY: i64 = 6;

pub const SHIELD_CHANCE: f64 = 0.03;
pub const SHIELD_SIZE: f64 = 25.0;
pub const SHIELD_MS: f64 = 5000.0;
pub const SHIELD_POINTS: u32 = 50;
pub const STREAK_LENGTH: u32 = 5;
pub const STREAK_BONUS: u32 = 10;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        id: "playerSpeed",
        name: "Player Speed",
        min: 0.1,
        max: 0.5,
        step: 0.05,
        default: 0.2,
    },
    ParamSpec {
        id: "carSpeed",
        name: "Car Speed",
        min: 1.0,
        max: 6.0,
        step: 0.5,
        default: 3.0,
    },
    ParamSpec {
        id: "logSpeed",
        name: "Log Speed",
        min: 0.5,
        max: 3.0,
        step: 0.25,
        default: 1.5,
    },
    ParamSpec {
        id: "difficulty",
        name: "Difficulty",
        min: 0.5,
        max: 3.0,
        step: 0.1,
        default: 1.0,
    },
];

pub const SLOTS: &[AssetSlot] = &[
    AssetSlot {
        id: "background",
        name: "Background",
        width: 800,
        height: 600,
    },
    AssetSlot {
        id: "player",
        name: "Player",
        width: 30,
        height: 30,
    },
    AssetSlot {
        id: "car",
        name: "Car",
        width: 60,
        height: 30,
    },
    AssetSlot {
        id: "log",
        name: "Log",
        width: 120,
        height: 20,
    },
    AssetSlot {
        id: "shield",
        name: "Shield",
        width: 25,
        height: 25,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Safe,
    Road,
    River,
}

/// Anything that lives in a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traffic {
    Car,
    Truck,
    Bus,
    Log,
    Shield,
}

impl Traffic {
    pub fn is_vehicle(&self) -> bool {
        matches!(self, Self::Car | Self::Truck | Self::Bus)
    }

    /// Fixed size; logs get a random width at spawn instead.
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Car => Vec2::new(60.0, 30.0),
            Self::Truck => Vec2::new(80.0, 35.0),
            Self::Bus => Vec2::new(100.0, 40.0),
            Self::Log => Vec2::new(120.0, 35.0),
            Self::Shield => Vec2::new(SHIELD_SIZE, SHIELD_SIZE),
        }
    }

    pub fn slot(&self) -> &'static str {
        match self {
            Self::Car | Self::Truck | Self::Bus => "car",
            Self::Log => "log",
            Self::Shield => "shield",
        }
    }
}

/// One horizontal band of the world. Owns everything moving along it.
#[derive(Debug, Clone)]
pub struct Lane {
    /// 0 is the starting grass; grows upward.
    pub index: i64,
    /// World y of the lane centre.
    pub y: f64,
    pub kind: LaneKind,
    /// +1 moves right, -1 moves left.
    pub direction: f64,
    /// Unscaled speed drawn at creation, 1..3 px per tick.
    pub base_speed: f64,
    pub spawner: Spawner,
    pub traffic: Vec<Entity<Traffic>>,
}

impl Lane {
    pub fn y_for(index: i64) -> f64 {
        START.y - index as f64 * GRID
    }
}

/// Speed multipliers derived from the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub player_speed: f64,
    pub car_scale: f64,
    pub log_scale: f64,
}

impl Tuning {
    pub fn from_config(config: &GameConfig) -> Self {
        let get = |id| crate::core::config::param(config, PARAMS, id);
        Self {
            player_speed: get("playerSpeed"),
            car_scale: get("carSpeed") / 3.0,
            log_scale: get("logSpeed") / 1.5 * 0.5,
        }
    }

    pub fn scale_for(&self, kind: LaneKind) -> f64 {
        match kind {
            LaneKind::Road => self.car_scale,
            LaneKind::River => self.log_scale,
            LaneKind::Safe => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrossyGame {
    pub session: Session,
    pub tuning: Tuning,
    pub player: Entity<()>,
    /// Horizontal velocity of the log being ridden, if any.
    pub riding: Option<f64>,
    pub shield_ms: f64,
    /// Highest lane index reached this session.
    pub furthest_row: i64,
    pub streak: u32,
    /// World y of the top edge of the view. Only ever decreases.
    pub camera_y: f64,
    pub lanes: Vec<Lane>,
    /// Lowest lane index not yet generated.
    pub next_lane: i64,
    pub clock: FixedStep,
}
