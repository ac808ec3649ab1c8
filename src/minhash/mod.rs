//! MinHash + LSH near-duplicate index.
//!
//! This module provides online near-duplicate detection over streaming
//! text documents: each added document is folded into a MinHash
//! signature column, and queries use LSH banding to compare against the
//! whole collection in expected sublinear time.

pub mod hashing;
pub mod shingles;
pub mod signature;

use std::io::Read;
use std::time::Instant;

use dashmap::DashSet;
use parking_lot::{RwLock, RwLockWriteGuard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{validate_unit_range, IndexConfig};
use crate::core::errors::{NeardupError, Result};
use crate::io::snapshot::IndexSnapshot;

use hashing::{HashFamily, P1, P2};
use signature::{band_column, signature_column};

/// A matching document returned by [`MinHashIndex::find_similar`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// ID the document was added under.
    pub id: String,

    /// Estimated Jaccard similarity to the query, from 0 to 1.
    ///
    /// Measured at band granularity: the fraction of band positions the
    /// stored document shares with the query.
    pub similarity: f64,
}

/// Signature matrix and its lockstep column → ID mapping.
#[derive(Debug, Default)]
struct ColumnStore {
    matrix: Vec<Vec<u32>>,
    column_ids: Vec<String>,
}

/// Online near-duplicate index over MinHash signatures with LSH banding.
///
/// The index is append-only: documents can be added and queried but
/// never removed or updated. All operations take `&self` and are safe to
/// call from multiple threads; see the lock notes on each method.
#[derive(Debug)]
pub struct MinHashIndex {
    config: IndexConfig,

    /// Row hash family, `bands * rows` functions over [`P1`].
    hashers: HashFamily,

    /// Band hash family, `bands` functions over [`P2`].
    band_hashers: HashFamily,

    /// Signature matrix and column mapping (the matrix lock).
    store: RwLock<ColumnStore>,

    /// Derived band matrix; `None` after any write (the band lock).
    bands: RwLock<Option<Vec<Vec<u32>>>>,

    /// Every ID ever added.
    ids: DashSet<String>,
}

impl MinHashIndex {
    /// Create an index with a hash family drawn from OS entropy.
    pub fn new(config: IndexConfig) -> Result<Self> {
        Self::with_seed(config, rand::rng().random::<u64>())
    }

    /// Create an index with a deterministic hash family.
    ///
    /// The same `(config, seed)` pair always generates the same two
    /// families, so signatures and query results are reproducible.
    pub fn with_seed(config: IndexConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let hashers = HashFamily::generate(config.signature_len(), P1, &mut rng);
        let band_hashers = HashFamily::generate(config.bands, P2, &mut rng);

        debug!(
            bands = config.bands,
            rows = config.rows,
            shingle_size = config.shingle_size,
            "created minhash index"
        );

        Ok(Self {
            config,
            hashers,
            band_hashers,
            store: RwLock::new(ColumnStore::default()),
            bands: RwLock::new(None),
            ids: DashSet::new(),
        })
    }

    /// The construction parameters of this index.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Add a document under `id`.
    ///
    /// The signature is built with no locks held; the matrix append and
    /// the band-cache invalidation then each take their own write lock.
    /// Adding an existing ID appends a second column for it; every
    /// column is independently returnable by [`find_similar`](Self::find_similar).
    pub fn add<R: Read>(&self, id: &str, reader: R) {
        let column = signature_column(&self.hashers, self.config.shingle_size, reader);

        {
            let mut store = self.store.write();
            store.matrix.push(column);
            store.column_ids.push(id.to_string());
        }

        self.ids.insert(id.to_string());

        *self.bands.write() = None;

        debug!(id, "added document");
    }

    /// Find stored documents whose similarity to the query is at least
    /// `threshold`.
    ///
    /// Returns an error if `threshold` is outside `[0, 1]`. Matches are
    /// emitted in insertion order. A query that races with a concurrent
    /// `add` may or may not observe the new document; a query that
    /// starts after an `add` returned always does.
    pub fn find_similar<R: Read>(&self, reader: R, threshold: f64) -> Result<Vec<Match>> {
        validate_unit_range(threshold, "threshold")?;

        let query_signature =
            signature_column(&self.hashers, self.config.shingle_size, reader);
        let query_bands = band_column(&self.band_hashers, self.config.rows, &query_signature);

        // (column index, similarity) for candidates over the threshold
        let scored: Vec<(usize, f64)> = {
            let cache = self.band_cache();
            match cache.as_ref() {
                Some(band_matrix) => band_matrix
                    .iter()
                    .enumerate()
                    .filter(|(_, stored)| {
                        // one colliding band position promotes to candidate
                        stored.iter().zip(&query_bands).any(|(a, b)| a == b)
                    })
                    .filter_map(|(i, stored)| {
                        let similarity = band_jaccard(stored, &query_bands);
                        (similarity >= threshold).then_some((i, similarity))
                    })
                    .collect(),
                // unreachable while the cache guard is held
                None => Vec::new(),
            }
        };

        // the band guard is released; resolve column indices to IDs
        let store = self.store.read();
        Ok(scored
            .into_iter()
            .filter_map(|(i, similarity)| {
                store.column_ids.get(i).map(|id| Match {
                    id: id.clone(),
                    similarity,
                })
            })
            .collect())
    }

    /// Whether a document was ever added under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of stored signature columns (documents added).
    pub fn len(&self) -> usize {
        self.store.read().matrix.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capture the complete index state for persistence.
    ///
    /// The snapshot includes both hash families; restoring without them
    /// would invalidate every stored signature. The band cache is
    /// derived state and is not captured.
    pub fn snapshot(&self) -> IndexSnapshot {
        let store = self.store.read();
        IndexSnapshot {
            config: self.config,
            hashers: self.hashers.clone(),
            band_hashers: self.band_hashers.clone(),
            matrix: store.matrix.clone(),
            column_ids: store.column_ids.clone(),
        }
    }

    /// Restore an index from a snapshot, validating its invariants.
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Result<Self> {
        snapshot.config.validate()?;

        if snapshot.hashers.len() != snapshot.config.signature_len() {
            return Err(NeardupError::validation(format!(
                "snapshot row family has {} functions, config requires {}",
                snapshot.hashers.len(),
                snapshot.config.signature_len(),
            )));
        }

        if snapshot.band_hashers.len() != snapshot.config.bands {
            return Err(NeardupError::validation(format!(
                "snapshot band family has {} functions, config requires {}",
                snapshot.band_hashers.len(),
                snapshot.config.bands,
            )));
        }

        if snapshot.matrix.len() != snapshot.column_ids.len() {
            return Err(NeardupError::validation(format!(
                "snapshot has {} columns but {} column IDs",
                snapshot.matrix.len(),
                snapshot.column_ids.len(),
            )));
        }

        if let Some(bad) = snapshot
            .matrix
            .iter()
            .find(|column| column.len() != snapshot.config.signature_len())
        {
            return Err(NeardupError::validation(format!(
                "snapshot column has length {}, expected {}",
                bad.len(),
                snapshot.config.signature_len(),
            )));
        }

        let ids = snapshot.column_ids.iter().cloned().collect::<DashSet<_>>();

        Ok(Self {
            config: snapshot.config,
            hashers: snapshot.hashers,
            band_hashers: snapshot.band_hashers,
            store: RwLock::new(ColumnStore {
                matrix: snapshot.matrix,
                column_ids: snapshot.column_ids,
            }),
            bands: RwLock::new(None),
            ids,
        })
    }

    /// Acquire the band matrix for reading, materializing it first if a
    /// write invalidated it.
    ///
    /// Readers that find the cache present share the read lock; a reader
    /// that finds it absent upgrades to the write lock, re-checks,
    /// rebuilds from the signature matrix, and downgrades back to read.
    fn band_cache(&self) -> parking_lot::RwLockReadGuard<'_, Option<Vec<Vec<u32>>>> {
        let guard = self.bands.read();
        if guard.is_some() {
            return guard;
        }
        drop(guard);

        let mut guard = self.bands.write();
        if guard.is_none() {
            *guard = Some(self.materialize_bands());
        }
        RwLockWriteGuard::downgrade(guard)
    }

    /// Project every stored signature column onto its band column.
    fn materialize_bands(&self) -> Vec<Vec<u32>> {
        let start = Instant::now();
        let store = self.store.read();

        let band_matrix: Vec<Vec<u32>> = store
            .matrix
            .par_iter()
            .map(|column| band_column(&self.band_hashers, self.config.rows, column))
            .collect();

        debug!(
            columns = band_matrix.len(),
            elapsed = ?start.elapsed(),
            "materialized band matrix"
        );

        band_matrix
    }
}

/// Fraction of positions where two band columns agree.
fn band_jaccard(a: &[u32], b: &[u32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let matching = a.iter().zip(b).filter(|(x, y)| x == y).count();
    matching as f64 / a.len() as f64
}
