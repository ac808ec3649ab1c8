//! # Neardup: Online Near-Duplicate Document Detection
//!
//! An in-memory MinHash + LSH index for finding near-duplicate text
//! documents. Documents are streamed in, shingled into overlapping
//! character windows, and folded into fixed-width signature columns;
//! queries compare against the whole collection through an LSH band
//! matrix in expected sublinear time.
//!
//! - **Shingling**: lazy `N`-character windows over any `Read` stream
//! - **Signatures**: per-document minima across a fixed family of
//!   `B * R` universal hash functions
//! - **LSH banding**: `B` band hashes drive candidate selection; the
//!   band matrix is cached and invalidated on every write
//! - **Concurrency**: reader-writer locking throughout; all index
//!   operations take `&self`
//!
//! ## Quick Start
//!
//! ```rust
//! use neardup::{IndexConfig, MinHashIndex};
//!
//! fn main() -> neardup::Result<()> {
//!     let index = MinHashIndex::new(IndexConfig::default())?;
//!
//!     index.add("p1", "hello world foo baz bar zomg".as_bytes());
//!     index.add("p2", "goodbye world foo qux bar zomg".as_bytes());
//!
//!     let matches = index.find_similar("hello world foo baz bar zomg".as_bytes(), 0.5)?;
//!     assert_eq!(matches[0].id, "p1");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
// Additional allows for tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Core configuration and error types
pub mod core {
    //! Construction parameters and error types.

    pub mod config;
    pub mod errors;
}

// The MinHash + LSH index
pub mod minhash;

// Snapshot persistence
pub mod io {
    //! On-disk persistence of index state.

    pub mod snapshot;
}

// Replication-facing command records
pub mod api {
    //! Records exposed to external replication machinery.

    pub mod commands;
}

// Re-export primary types for convenience
pub use api::commands::WriteCommand;
pub use crate::core::config::IndexConfig;
pub use crate::core::errors::{NeardupError, Result};
pub use io::snapshot::IndexSnapshot;
pub use minhash::{Match, MinHashIndex};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
