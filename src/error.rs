//! Errors from collaborator I/O (high score file, config files)
//!
//! None of these ever reach gameplay: callers log and fall back.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid high score: {0}")]
    Parse(#[from] std::num::ParseIntError),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
