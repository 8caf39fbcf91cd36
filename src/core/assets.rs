//! User sprites that replace a slot's procedural drawing.
//!
//! A sprite file is plain text: every line is one row of glyphs and `.` is
//! transparent. An optional first line `color: #RRGGBB` tints the glyphs.
//! Files are read on a background thread; the frame loop only ever polls.

use super::render::Rgb;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Glyph that marks a transparent cell.
pub const TRANSPARENT: char = '.';

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub color: Rgb,
    pub width: usize,
    pub height: usize,
    rows: Vec<Vec<Option<char>>>,
}

impl Sprite {
    pub fn parse(name: &str, text: &str) -> io::Result<Sprite> {
        let mut color = Rgb::WHITE;
        let mut lines = text.lines().peekable();
        if let Some(first) = lines.peek() {
            if let Some(hex) = first.trim().strip_prefix("color:") {
                let hex = hex.trim().trim_start_matches('#');
                let value = u32::from_str_radix(hex, 16).map_err(|e| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("bad sprite color: {e}"))
                })?;
                color = Rgb::hex(value);
                lines.next();
            }
        }

        let rows: Vec<Vec<Option<char>>> = lines
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| if c == TRANSPARENT { None } else { Some(c) })
                    .collect()
            })
            .collect();

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("sprite '{name}' has no rows"),
            ));
        }

        Ok(Sprite {
            name: name.to_string(),
            color,
            width,
            height: rows.len(),
            rows,
        })
    }

    pub fn load(path: &Path) -> io::Result<Sprite> {
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sprite".to_string());
        Sprite::parse(&name, &text)
    }

    /// Glyph at (`col`, `row`); `None` for transparent or out of range.
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

/// Loaded sprites by slot id.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    slots: HashMap<String, Sprite>,
}

impl AssetStore {
    pub fn get(&self, slot: &str) -> Option<&Sprite> {
        self.slots.get(slot)
    }

    pub fn insert(&mut self, slot: &str, sprite: Sprite) {
        self.slots.insert(slot.to_string(), sprite);
    }

    pub fn remove(&mut self, slot: &str) -> Option<Sprite> {
        self.slots.remove(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Background sprite reader. Dropping it abandons any reads still in flight;
/// their results are discarded by the worker.
pub struct AssetLoader {
    rx: Receiver<(String, io::Result<Sprite>)>,
    pending: usize,
}

impl AssetLoader {
    /// Start reading every `slot -> path` entry on a worker thread.
    pub fn spawn(assets: BTreeMap<String, PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        let pending = assets.len();
        thread::spawn(move || {
            for (slot, path) in assets {
                let result = Sprite::load(&path);
                // The receiver is gone once the game view has been torn down.
                if tx.send((slot, result)).is_err() {
                    return;
                }
            }
        });
        Self { rx, pending }
    }

    /// Number of sprites not yet delivered.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Move any finished sprites into `store`. Failures keep the procedural
    /// fallback for that slot. Returns how many sprites were installed.
    pub fn poll(&mut self, store: &mut AssetStore) -> usize {
        let mut installed = 0;
        loop {
            match self.rx.try_recv() {
                Ok((slot, Ok(sprite))) => {
                    debug!("sprite '{}' loaded for slot '{}'", sprite.name, slot);
                    store.insert(&slot, sprite);
                    installed += 1;
                    self.pending = self.pending.saturating_sub(1);
                }
                Ok((slot, Err(e))) => {
                    warn!("failed to load sprite for slot '{}': {}", slot, e);
                    self.pending = self.pending.saturating_sub(1);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.pending = 0;
                    break;
                }
            }
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_parse_rows_and_transparency() {
        let sprite = Sprite::parse("car", "..#..\n#####\n").expect("valid sprite");
        assert_eq!(sprite.width, 5);
        assert_eq!(sprite.height, 2);
        assert_eq!(sprite.glyph(0, 0), None);
        assert_eq!(sprite.glyph(2, 0), Some('#'));
        assert_eq!(sprite.glyph(9, 9), None);
        assert_eq!(sprite.color, Rgb::WHITE);
    }

    #[test]
    fn test_parse_color_header() {
        let sprite = Sprite::parse("gem", "color: #FF4444\n<>").expect("valid sprite");
        assert_eq!(sprite.color, Rgb(0xFF, 0x44, 0x44));
        assert_eq!(sprite.height, 1);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(Sprite::parse("empty", "\n\n").is_err());
        assert!(Sprite::parse("bad", "color: #zz\n##").is_err());
    }

    fn drain(loader: &mut AssetLoader, store: &mut AssetStore) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while loader.pending() > 0 && Instant::now() < deadline {
            loader.poll(store);
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_loader_installs_and_skips_failures() {
        let dir = std::env::temp_dir().join(format!("arcade-assets-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("frog.txt");
        fs::write(&good, "color: #44FF44\n(o)\n/ \\").unwrap();

        let mut map = BTreeMap::new();
        map.insert("player".to_string(), good.clone());
        map.insert("car".to_string(), dir.join("missing.txt"));

        let mut store = AssetStore::default();
        let mut loader = AssetLoader::spawn(map);
        drain(&mut loader, &mut store);

        assert_eq!(loader.pending(), 0);
        assert!(store.get("player").is_some());
        assert!(store.get("car").is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_dropped_loader_is_harmless() {
        let mut map = BTreeMap::new();
        map.insert("player".to_string(), PathBuf::from("/nonexistent/sprite.txt"));
        let loader = AssetLoader::spawn(map);
        drop(loader);
        // Worker finishes on its own; nothing to assert beyond not panicking.
        thread::sleep(Duration::from_millis(20));
    }
}
