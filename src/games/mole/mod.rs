//! Whack-the-Mole: hit moles as they pop out of a 3x3 grid of holes before
//! the clock runs out.
//!
//! Golden moles pay more, bombs cost points, and quick consecutive hits
//! build a combo bonus.

mod logic;
mod render;
pub mod types;

pub use logic::*;
pub use types::*;
