//! High score persistence
//!
//! The best score is stored as one plain integer (XDG config or
//! ~/.config/lane-runner/highscore). Reads happen once at startup, writes
//! only when a run beats the stored value. Failures never reach gameplay.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

const APP_DIR: &str = "lane-runner";
const FILENAME: &str = "highscore";

/// Where the high score lives
pub trait HighScoreStore {
    fn read(&self) -> Result<u64, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Read, treating any failure as "no high score yet"
pub fn read_or_zero(store: &dyn HighScoreStore) -> u64 {
    match store.read() {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Could not read high score ({}), starting from 0", e);
            0
        }
    }
}

/// Save and drop any error after logging it
pub fn save_best_effort(store: &mut dyn HighScoreStore, score: u64) {
    match store.save(score) {
        Ok(()) => log::info!("High score {} saved", score),
        Err(e) => log::warn!("Could not save high score {}: {}", score, e),
    }
}

/// Default location: $XDG_CONFIG_HOME/lane-runner/highscore, else
/// $HOME/.config/lane-runner/highscore, else ./.config/...
pub fn default_path() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".config"),
    };
    base.join(APP_DIR).join(FILENAME)
}

/// Plain-text file holding a single integer
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScore {
    fn read(&self) -> Result<u64, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        Ok(trimmed.parse::<u64>()?)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, format!("{}\n", score))?;
        Ok(())
    }
}

/// In-memory store for tests and headless runs without a file
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    pub score: u64,
    /// Every value passed to `save`, in order
    pub saves: Vec<u64>,
    /// Make every write fail
    pub fail_writes: bool,
}

impl MemoryHighScore {
    pub fn with_score(score: u64) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn read(&self) -> Result<u64, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        self.score = score;
        self.saves.push(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lane-runner-test-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let store = FileHighScore::new(scratch("missing").join("highscore"));
        assert_eq!(store.read().unwrap(), 0);
    }

    #[test]
    fn test_save_then_read() {
        let dir = scratch("roundtrip");
        let mut store = FileHighScore::new(dir.join("nested").join("highscore"));
        store.save(42).unwrap();
        assert_eq!(store.read().unwrap(), 42);
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim(), "42");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_garbage_is_parse_error_and_reads_as_zero() {
        let dir = scratch("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("highscore");
        fs::write(&path, "not a number").unwrap();
        let store = FileHighScore::new(&path);
        assert!(matches!(store.read(), Err(StoreError::Parse(_))));
        assert_eq!(read_or_zero(&store), 0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_failed_write_is_swallowed() {
        let mut store = MemoryHighScore {
            fail_writes: true,
            ..MemoryHighScore::with_score(7)
        };
        save_best_effort(&mut store, 9);
        assert_eq!(store.score, 7);
        assert!(store.saves.is_empty());
    }

    #[test]
    fn test_default_path_ends_with_app_file() {
        let path = default_path();
        assert!(path.ends_with(Path::new(APP_DIR).join(FILENAME)));
    }
}
