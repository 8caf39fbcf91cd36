//! Best scores and recent results, kept in ~/.arcade/scores.dat.
//!
//! File format:
//! - Version magic (8 bytes, little endian)
//! - Data length (4 bytes, little endian)
//! - bincode-encoded `ScoreBoard`
//! - SHA-256 over the three fields above (32 bytes)

use crate::core::{ScoreReporter, SessionReport};
use crate::utils::persistence::write_atomic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SCORES_VERSION_MAGIC: u64 = 0x4152_4344_5343_0001;
pub const SCORES_FILENAME: &str = "scores.dat";
/// Number of recent results kept.
pub const RECENT_LIMIT: usize = 50;
/// Magic, length and checksum around the payload.
const FRAME_BYTES: u64 = 8 + 4 + 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: Uuid,
    pub game: String,
    pub score: u32,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub best: BTreeMap<String, u32>,
    /// Newest last.
    pub recent: Vec<ScoreRecord>,
}

impl ScoreBoard {
    /// Record a finished session. Returns true when it set a new best.
    pub fn record(&mut self, game: &str, score: u32) -> bool {
        self.recent.push(ScoreRecord {
            id: Uuid::new_v4(),
            game: game.to_string(),
            score,
            recorded_at: Utc::now(),
        });
        if self.recent.len() > RECENT_LIMIT {
            let excess = self.recent.len() - RECENT_LIMIT;
            self.recent.drain(..excess);
        }

        let best = self.best.entry(game.to_string()).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    pub fn best(&self, game: &str) -> u32 {
        self.best.get(game).copied().unwrap_or(0)
    }

    /// Recent results for one game, newest first.
    pub fn recent_for<'a>(&'a self, game: &'a str) -> impl Iterator<Item = &'a ScoreRecord> {
        self.recent.iter().rev().filter(move |r| r.game == game)
    }
}

impl ScoreReporter for ScoreBoard {
    fn report(&mut self, report: &SessionReport) {
        if self.record(report.game, report.score) {
            log::info!("new best for {}: {}", report.game, report.score);
        }
    }
}

/// Reads and writes a `ScoreBoard` with checksum verification.
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// Store at ~/.arcade/scores.dat.
    pub fn new() -> io::Result<Self> {
        Ok(Self::at(crate::utils::data_path(SCORES_FILENAME)?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, board: &ScoreBoard) -> io::Result<()> {
        let data =
            bincode::serialize(board).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = u32::try_from(data.len())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut hasher = Sha256::new();
        hasher.update(SCORES_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut bytes = Vec::with_capacity(data.len() + FRAME_BYTES as usize);
        bytes.extend_from_slice(&SCORES_VERSION_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(&data);
        bytes.extend_from_slice(&checksum);
        write_atomic(&self.path, &bytes)
    }

    /// Fails with `NotFound` when there is no file and `InvalidData` when
    /// the magic, checksum or payload is bad.
    pub fn load(&self) -> io::Result<ScoreBoard> {
        let mut file = fs::File::open(&self.path)?;
        let file_len = file.metadata()?.len();

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SCORES_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid score file version: expected 0x{:016X}, got 0x{:016X}",
                    SCORES_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);
        if u64::from(data_len) + FRAME_BYTES != file_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Score data length {} does not match file size {}",
                    data_len, file_len
                ),
            ));
        }

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// An empty board when the file is missing; a damaged file is logged
    /// and replaced on the next save.
    pub fn load_or_default(&self) -> ScoreBoard {
        match self.load() {
            Ok(board) => board,
            Err(e) if e.kind() == io::ErrorKind::NotFound => ScoreBoard::default(),
            Err(e) => {
                log::warn!("discarding score file {}: {}", self.path.display(), e);
                ScoreBoard::default()
            }
        }
    }
}
