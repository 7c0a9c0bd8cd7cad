//! tally_io — local file I/O for the tally engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - `snapshot`: the in-memory `ElectionSnapshot` and its integrity checks.
//! - `loader`: JSON file → validated snapshot / allocation params.
//! - `canonical_json` + `hasher`: sorted-key JSON bytes and SHA-256 digests.
//!
//! No network I/O.

#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, read, create_dir_all, rename).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors, with line/column when known.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Snapshot integrity violations.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    #[error("hash error: {0}")]
    Hash(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        let pointer = if e.line() == 0 {
            "/".to_string()
        } else {
            format!("line {} column {}", e.line(), e.column())
        };
        IoError::Json { pointer, msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod snapshot;

pub mod prelude {
    pub use crate::canonical_json::{to_canonical_json_bytes, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_hex};
    pub use crate::loader::{load_params, load_snapshot};
    pub use crate::snapshot::ElectionSnapshot;
    pub use crate::{IoError, IoResult};
}
