//! Serializable write commands for replication.
//!
//! The index itself has no replication machinery; it exposes a single
//! command record that an external log/replication layer can ship
//! between nodes and apply against each node's local index. There is no
//! delete and no update: the index is append-only.

use serde::{Deserialize, Serialize};

use crate::minhash::MinHashIndex;

/// A command to index a document under an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteCommand {
    /// Document ID.
    pub id: String,

    /// Document text to be indexed.
    pub value: String,
}

impl WriteCommand {
    /// Create a new write command.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Wire name of this command.
    pub fn command_name(&self) -> &'static str {
        "write"
    }

    /// Apply the command to a local index.
    pub fn apply(&self, index: &MinHashIndex) {
        index.add(&self.id, self.value.as_bytes());
    }
}
