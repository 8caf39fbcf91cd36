//! Match-3 data structures and tuning.

use super::board::Board;
use crate::core::{AssetSlot, FixedStep, GridPos, ParamSpec, Rgb, Session};

pub const GEM_SIZE: f64 = 50.0;
/// Height of the status strip under the board.
pub const HUD_HEIGHT: f64 = 80.0;
/// Swap and fall animation length.
pub const TWEEN_MS: f64 = 300.0;
pub const HINT_MS: f64 = 3000.0;
pub const POINTS_PER_GEM: u32 = 10;
pub const CASCADE_BONUS: f64 = 0.5;
/// Refill re-roll budget per gem.
pub const REROLL_ATTEMPTS: u32 = 100;
/// Resolution stops after this many cascades even if matches remain.
pub const MAX_CASCADES: u32 = 50;
pub const MAX_SPECIAL_CHANCE: f64 = 0.3;
pub const SPECIAL_CHANCE_PER_LEVEL: f64 = 0.02;
pub const MOVES_PER_LEVEL_STEP: u32 = 5;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec {
        id: "gridSize",
        name: "Grid Size",
        min: 6.0,
        max: 10.0,
        step: 1.0,
        default: 8.0,
    },
    ParamSpec {
        id: "movesPerLevel",
        name: "Moves Per Level",
        min: 20.0,
        max: 50.0,
        step: 5.0,
        default: 30.0,
    },
    ParamSpec {
        id: "specialGemChance",
        name: "Special Gem Chance (%)",
        min: 0.0,
        max: 30.0,
        step: 5.0,
        default: 10.0,
    },
    ParamSpec {
        id: "targetScore",
        name: "Target Score",
        min: 500.0,
        max: 2000.0,
        step: 250.0,
        default: 1000.0,
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
        id: "red_gem",
        name: "Red Gem",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "blue_gem",
        name: "Blue Gem",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "green_gem",
        name: "Green Gem",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "yellow_gem",
        name: "Yellow Gem",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "purple_gem",
        name: "Purple Gem",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "orange_gem",
        name: "Orange Gem",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "bomb",
        name: "Bomb",
        width: 48,
        height: 48,
    },
    AssetSlot {
        id: "line_clear",
        name: "Line Clear",
        width: 48,
        height: 48,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemKind {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    /// Clears the 3x3 block around itself when triggered.
    Bomb,
    /// Clears its whole row and column when triggered.
    LineClear,
}

impl GemKind {
    pub const NORMAL: [GemKind; 6] = [
        GemKind::Red,
        GemKind::Blue,
        GemKind::Green,
        GemKind::Yellow,
        GemKind::Purple,
        GemKind::Orange,
    ];
    pub const SPECIAL: [GemKind; 2] = [GemKind::Bomb, GemKind::LineClear];

    pub fn is_special(&self) -> bool {
        matches!(self, Self::Bomb | Self::LineClear)
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Red => Rgb::hex(0xFF4444),
            Self::Blue => Rgb::hex(0x4444FF),
            Self::Green => Rgb::hex(0x44FF44),
            Self::Yellow => Rgb::hex(0xFFFF44),
            Self::Purple => Rgb::hex(0xFF44FF),
            Self::Orange => Rgb::hex(0xFF8844),
            Self::Bomb => Rgb::hex(0x2F2F2F),
            Self::LineClear => Rgb::WHITE,
        }
    }

    pub fn slot(&self) -> &'static str {
        match self {
            Self::Red => "red_gem",
            Self::Blue => "blue_gem",
            Self::Green => "green_gem",
            Self::Yellow => "yellow_gem",
            Self::Purple => "purple_gem",
            Self::Orange => "orange_gem",
            Self::Bomb => "bomb",
            Self::LineClear => "line_clear",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Match3Game {
    pub session: Session,
    pub board: Board,
    pub grid_size: usize,
    pub level: u32,
    pub moves_left: u32,
    pub target: u32,
    pub moves_per_level: u32,
    pub base_target: u32,
    /// Special chance at level 1, as a probability.
    pub base_special_chance: f64,
    pub special_chance: f64,
    pub cursor: GridPos,
    pub selected: Option<GridPos>,
    pub hint: Option<(GridPos, GridPos)>,
    pub hint_ms: f64,
    /// Deepest cascade reached by the last move.
    pub last_cascade: u32,
    pub clock: FixedStep,
}
