//! Crossy Road: hop a frog up an endless stack of roads and rivers.
//!
//! Lanes scroll by underneath a camera that only moves upward. Vehicles on
//! road lanes kill on contact, river lanes kill unless the frog stands on a
//! log, and shields on grass lanes grant a few seconds of invincibility.

mod logic;
mod render;
pub mod types;

pub use logic::*;
pub use types::*;
