use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stopwatch_core::Snapshot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// On-disk layout. Each field is one key of the store; the lap list is a
/// serialized array kept as a string value.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct StoredState {
    accumulated_ms: u64,
    running: bool,
    lap_counter: u32,
    lap_times: Option<String>,
    last_save_timestamp: i64,
}

impl Default for StoredState {
    fn default() -> Self {
        Self {
            accumulated_ms: 0,
            running: false,
            lap_counter: 1,
            lap_times: None,
            last_save_timestamp: 0,
        }
    }
}

impl StoredState {
    fn from_snapshot(snapshot: &Snapshot) -> StorageResult<Self> {
        Ok(Self {
            accumulated_ms: snapshot.accumulated_ms,
            running: snapshot.running,
            lap_counter: snapshot.lap_counter,
            lap_times: Some(serde_json::to_string(&snapshot.laps)?),
            last_save_timestamp: snapshot.saved_at_ms,
        })
    }

    fn into_snapshot(self) -> Snapshot {
        let laps = match self.lap_times.as_deref() {
            Some(json) => serde_json::from_str::<Vec<String>>(json).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable lap list: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        Snapshot {
            accumulated_ms: self.accumulated_ms,
            running: self.running,
            lap_counter: self.lap_counter,
            laps,
            saved_at_ms: self.last_save_timestamp,
        }
    }
}

/// Single-snapshot key-value store backed by a JSON file.
pub struct StopwatchStorage {
    path: PathBuf,
}

impl StopwatchStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved snapshot, or `None` when there is nothing usable on disk.
    pub fn load_snapshot(&self) -> Option<Snapshot> {
        match self.read() {
            Ok(Some(snapshot)) => {
                log::debug!("Loaded snapshot from {}", self.path.display());
                Some(snapshot)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Ignoring saved state at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save_snapshot(&self, snapshot: &Snapshot) {
        match self.write(snapshot) {
            Ok(()) => log::debug!("Saved snapshot to {}", self.path.display()),
            Err(e) => log::error!("Failed to save stopwatch state: {}", e),
        }
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Cleared {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::error!("Failed to clear stopwatch state: {}", e),
        }
    }

    fn read(&self) -> StorageResult<Option<Snapshot>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredState = serde_json::from_slice(&data)?;
        Ok(Some(stored.into_snapshot()))
    }

    /// Replace the file in one rename so a crash never leaves half a snapshot.
    fn write(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let stored = StoredState::from_snapshot(snapshot)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &stored)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
