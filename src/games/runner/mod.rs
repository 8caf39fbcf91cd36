//! Speed Runner: an endless side-scroller where the runner jumps and slides
//! past obstacles.
//!
//! The world scrolls faster every 100 m. Shield and double-score power-ups
//! drift in every few seconds.

mod logic;
mod render;
pub mod types;

pub use logic::*;
pub use types::*;
