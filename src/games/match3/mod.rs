//! Match-3: swap neighbouring gems to line up three or more of a kind.
//!
//! Cleared gems drop out, the columns above fall and new gems slide in from
//! the top, which can set off further matches scored at a rising rate. Bombs
//! and line clears fire when a match forms next to them. Each level has a
//! move budget and a target score.

pub mod board;
mod logic;
mod render;
pub mod types;

pub use board::*;
pub use types::*;
