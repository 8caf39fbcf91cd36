//! Engine core shared by every game: geometry, entities, spawning, session
//! state, input flags, configuration, sprites and the render sink.

pub mod assets;
pub mod config;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod render;
pub mod session;
pub mod spawn;

pub use assets::{AssetLoader, AssetStore, Sprite};
pub use config::{ArcadeConfig, AssetSlot, GameConfig, ParamSpec, ParamValue};
pub use entity::{Anchor, Entity, FixedStep, Flags, Motion, PHYSICS_TICK_MS};
pub use geometry::{overlaps, overlaps_with_tolerance, Rect, Vec2};
pub use input::{Controls, Direction, GridPos};
pub use render::{draw_slot, DrawCall, DrawList, RenderSink, Rgb};
pub use session::{GameState, Outcome, ScoreReporter, Session, SessionReport};
pub use spawn::{clear_of, Spawner, WeightedTable};
