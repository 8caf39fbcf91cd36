//! Utility modules: data-directory persistence.

pub mod persistence;

pub use persistence::{arcade_dir, data_path};
