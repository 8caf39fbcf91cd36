//! Commit and date stamped in by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `<binary> <version> (<date>, <commit>)`, printed by `--version` and
/// logged at startup.
pub fn version_line(binary: &str) -> String {
    format!(
        "{} {} ({}, {})",
        binary,
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}
