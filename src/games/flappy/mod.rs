//! Flappy Bird: keep the bird airborne and thread it through pipe gaps.
//!
//! Gravity pulls the bird down every physics tick and a flap sets an upward
//! velocity. Every five pipes the scroll speed rises and pipes come sooner.

mod logic;
mod render;
pub mod types;

pub use logic::*;
pub use types::*;
