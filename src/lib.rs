//! Arcade - five small games on a shared real-time engine core.
//!
//! This module exposes the engine and game logic for testing and the
//! headless simulator.

pub mod build_info;
pub mod core;
pub mod games;
pub mod scores;
pub mod utils;

// UI module is not exposed as it's tightly coupled to the terminal
