//! Index construction parameters and validation helpers.

use serde::{Deserialize, Serialize};

use crate::core::errors::{NeardupError, Result};

/// MinHash index configuration.
///
/// The hash-family sizes are fixed by these three parameters: the index
/// generates `bands * rows` row hashers and `bands` band hashers at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Number of LSH bands (`B`)
    pub bands: usize,

    /// Number of signature rows per band (`R`)
    pub rows: usize,

    /// Character window size for shingling (`N`)
    pub shingle_size: usize,
}

/// Default implementation for [`IndexConfig`].
impl Default for IndexConfig {
    /// Returns the default configuration (100 bands, 2 rows, 2-char shingles).
    fn default() -> Self {
        Self {
            bands: 100,
            rows: 2,
            shingle_size: 2,
        }
    }
}

/// Validation and derived-size accessors for [`IndexConfig`].
impl IndexConfig {
    /// Create a configuration from the `(B, R, N)` triple.
    pub fn new(bands: usize, rows: usize, shingle_size: usize) -> Self {
        Self {
            bands,
            rows,
            shingle_size,
        }
    }

    /// Validate the configuration.
    ///
    /// Every parameter must be at least 1; a zero anywhere would produce
    /// an empty hash family or an empty shingle stream for all inputs.
    pub fn validate(&self) -> Result<()> {
        if self.bands == 0 {
            return Err(NeardupError::config_field(
                "bands must be greater than 0",
                "bands",
            ));
        }

        if self.rows == 0 {
            return Err(NeardupError::config_field(
                "rows must be greater than 0",
                "rows",
            ));
        }

        if self.shingle_size == 0 {
            return Err(NeardupError::config_field(
                "shingle_size must be greater than 0",
                "shingle_size",
            ));
        }

        Ok(())
    }

    /// Total number of row hashers (the signature column length `B * R`).
    pub fn signature_len(&self) -> usize {
        self.bands * self.rows
    }
}

/// Validate that a value lies within the closed unit range `[0, 1]`.
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(NeardupError::validation_field(
            format!("{field} must be within [0, 1], got {value}"),
            field,
        ));
    }
    Ok(())
}
