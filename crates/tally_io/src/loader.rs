//! Loader: read a local snapshot / params JSON file, validate, normalize.
//! No network I/O.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tally_core::variables::AllocationParams;
use tracing::{debug, info};

use crate::snapshot::ElectionSnapshot;
use crate::{hasher, IoError, IoResult};

/// Inputs larger than this are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 256 * 1024 * 1024;

fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let meta = fs::metadata(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if meta.len() > MAX_INPUT_BYTES {
        return Err(IoError::Path(format!(
            "{}: {} bytes exceeds limit of {MAX_INPUT_BYTES}",
            path.display(),
            meta.len()
        )));
    }
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Load, check and normalize a snapshot file.
pub fn load_snapshot(path: &Path) -> IoResult<ElectionSnapshot> {
    let mut snap: ElectionSnapshot = read_json(path)?;
    snap.validate()?;
    snap.normalize();
    info!(
        path = %path.display(),
        districts = snap.districts.len(),
        stations = snap.stations.len(),
        lists = snap.lists.len(),
        candidates = snap.candidates.len(),
        tallies = snap.tallies.len(),
        "snapshot loaded"
    );
    Ok(snap)
}

pub fn load_params(path: &Path) -> IoResult<AllocationParams> {
    let params: AllocationParams = read_json(path)?;
    debug!(path = %path.display(), tie_policy = %params.tie_policy, seed = params.tie_seed, "params loaded");
    Ok(params)
}

/// Digest of the normalized snapshot; identical content gives an identical
/// digest regardless of the file's key or record order.
pub fn snapshot_digest(snap: &ElectionSnapshot) -> IoResult<String> {
    hasher::sha256_canonical(snap)
}
