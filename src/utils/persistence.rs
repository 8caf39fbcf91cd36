//! Files under ~/.arcade: the config, the score table and the log.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DIR_NAME: &str = ".arcade";

/// ~/.arcade, created on first use.
pub fn arcade_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    arcade_dir().map(|dir| dir.join(filename))
}

/// Replace `path` with `bytes` via a sibling `.tmp` file and a rename, so
/// the old contents stay intact if the write fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Parse the JSON at `path`. Missing files give the default silently;
/// unreadable or malformed ones are logged first.
pub fn read_json<T: Default + DeserializeOwned>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            log::warn!("cannot read {}: {}", path.display(), e);
            return T::default();
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("ignoring malformed {}: {}", path.display(), e);
        T::default()
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write_atomic(path, json.as_bytes())
}

/// `read_json` for a file in ~/.arcade.
pub fn load_json_or_default<T: Default + DeserializeOwned>(filename: &str) -> T {
    match data_path(filename) {
        Ok(path) => read_json(&path),
        Err(e) => {
            log::warn!("no data directory for {}: {}", filename, e);
            T::default()
        }
    }
}

/// `write_json` for a file in ~/.arcade.
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> io::Result<()> {
    write_json(&data_path(filename)?, value)
}
