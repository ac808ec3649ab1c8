//! On-disk persistence of index state.
//!
//! A snapshot is the complete state of an index: construction
//! parameters, both hash families, the signature matrix, and the
//! column → ID mapping. The hash families are part of the payload
//! because signatures are only meaningful relative to the family that
//! produced them; a restore that regenerated the families would
//! silently orphan every stored column.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::IndexConfig;
use crate::core::errors::{NeardupError, Result};
use crate::minhash::hashing::HashFamily;

/// Serializable capture of the full index state.
///
/// Produced by [`MinHashIndex::snapshot`](crate::MinHashIndex::snapshot)
/// and consumed by
/// [`MinHashIndex::from_snapshot`](crate::MinHashIndex::from_snapshot),
/// which validates the invariants between these fields. The band matrix
/// is derived state and is not part of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub(crate) config: IndexConfig,
    pub(crate) hashers: HashFamily,
    pub(crate) band_hashers: HashFamily,
    pub(crate) matrix: Vec<Vec<u32>>,
    pub(crate) column_ids: Vec<String>,
}

impl IndexSnapshot {
    /// Number of stored signature columns in the snapshot.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// Whether the snapshot holds no documents.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Write the snapshot to `path`.
    ///
    /// Encodes to a temporary sibling file first and renames it into
    /// place, so a crash mid-write leaves any previous snapshot intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let encoded = bincode::serialize(self)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &encoded).map_err(|e| {
            NeardupError::io(
                format!("failed to write snapshot file: {}", temp_path.display()),
                e,
            )
        })?;

        fs::rename(&temp_path, path).map_err(|e| {
            NeardupError::io(
                format!("failed to rename snapshot into place: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), columns = self.len(), "saved snapshot");
        Ok(())
    }

    /// Read a snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            NeardupError::io(
                format!("failed to read snapshot file: {}", path.display()),
                e,
            )
        })?;

        let snapshot: Self = bincode::deserialize(&bytes)?;
        debug!(path = %path.display(), columns = snapshot.len(), "loaded snapshot");
        Ok(snapshot)
    }
}
