//! Flappy Bird data structures and tuning.

use crate::core::{
    Anchor, AssetSlot, Entity, FixedStep, Motion, ParamSpec, Rect, Session, Spawner, Vec2,
};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

pub const BIRD_X: f64 = 100.0;
pub const BIRD_START_Y: f64 = 300.0;
pub const BIRD_SIZE: f64 = 30.0;
pub const TERMINAL_VELOCITY: f64 = 10.0;

pub const PIPE_WIDTH: f64 = 60.0;
/// Gap sizes are drawn from `[pipeGap, pipeGap + PIPE_GAP_SPREAD)`.
pub const PIPE_GAP_SPREAD: f64 = 40.0;
/// Gaps never come closer than this to the top or bottom edge.
pub const PIPE_MARGIN: f64 = 100.0;
/// Pipe boxes shrink by this much on every edge before the hit test.
pub const PIPE_HITBOX_INSET: f64 = 2.0;

pub const SPAWN_INTERVAL_MS: f64 = 1800.0;
pub const SPAWN_FLOOR_MS: f64 = 1200.0;
/// With difficulty rising 0.5 per speed-up this trims 50 ms each time.
pub const SPAWN_EASE_MS: f64 = 100.0;

/// Points between speed-ups.
pub const SPEED_UP_EVERY: u32 = 5;
pub const SPEED_UP_STEP: f64 = 0.5;
pub const MILESTONES: [u32; 4] = [10, 25, 50, 100];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        id: "gravity",
        name: "Gravity",
        min: 0.2,
        max: 1.2,
        step: 0.1,
        default: 0.6,
    },
    ParamSpec {
        id: "jumpStrength",
        name: "Jump Strength",
        min: 6.0,
        max: 18.0,
        step: 1.0,
        default: 12.0,
    },
    ParamSpec {
        id: "pipeGap",
        name: "Pipe Gap",
        min: 100.0,
        max: 220.0,
        step: 20.0,
        default: 120.0,
    },
    ParamSpec {
        id: "gameSpeed",
        name: "Game Speed",
        min: 1.0,
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
        height: 600,
    },
    AssetSlot {
        id: "bird",
        name: "Bird",
        width: 30,
        height: 30,
    },
    AssetSlot {
        id: "pipe",
        name: "Pipe",
        width: 60,
        height: 300,
    },
];

/// A top and bottom pipe sharing one column, with the gap between them.
#[derive(Debug, Clone)]
pub struct Pipe {
    /// Full-height column; the two halves are carved out of it.
    pub body: Entity<()>,
    /// Top of the gap.
    pub gap_y: f64,
    pub gap: f64,
}

impl Pipe {
    pub fn new(x: f64, gap_y: f64, gap: f64, speed: f64) -> Self {
        Self {
            body: Entity::new(
                (),
                Vec2::new(x, 0.0),
                Vec2::new(PIPE_WIDTH, HEIGHT),
                Anchor::TopLeft,
            )
            .with_motion(Motion::Drift)
            .with_velocity(Vec2::new(-speed, 0.0)),
            gap_y,
            gap,
        }
    }

    pub fn x(&self) -> f64 {
        self.body.pos.x
    }

    pub fn top_rect(&self) -> Rect {
        let b = self.body.bounds();
        Rect::new(b.x, b.y, b.width, self.gap_y)
    }

    pub fn bottom_rect(&self) -> Rect {
        let b = self.body.bounds();
        let y = self.gap_y + self.gap;
        Rect::new(b.x, y, b.width, (b.height - y).max(0.0))
    }

    pub fn is_scored(&self) -> bool {
        self.body.flags.scored
    }
}

#[derive(Debug, Clone)]
pub struct FlappyGame {
    pub session: Session,
    pub bird: Entity<()>,
    pub pipes: Vec<Pipe>,
    pub spawner: Spawner,
    pub clock: FixedStep,
    pub jump_strength: f64,
    pub min_gap: f64,
    /// Scroll speed before speed-ups.
    pub base_speed: f64,
    pub milestones_hit: Vec<u32>,
}
