//! Terminal front-end: a character-cell render sink plus the menu and game
//! screens.

pub mod canvas;
pub mod game_common;
pub mod game_scene;
pub mod menu_scene;
