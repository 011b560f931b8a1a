use serde::Serialize;
use std::fmt;
use time::OffsetDateTime;

/// Hex object id of a commit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters, for display
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(hex: &str) -> Self {
        Self(hex.to_string())
    }
}

impl From<gix::ObjectId> for CommitId {
    fn from(oid: gix::ObjectId) -> Self {
        Self(oid.to_hex().to_string())
    }
}

/// A commit as read from the repository.
///
/// `timestamp` is the author date: it is what gets reported and what the
/// date window applies to. `committed` is the committer date, which orders
/// the walk frontier and drives pruning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    pub author: String,
    pub author_name: String,
    pub timestamp: OffsetDateTime,
    pub committed: OffsetDateTime,
    pub parents: Vec<CommitId>,
    pub files: Vec<String>,
}

/// A branch tip, frozen at scan start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub tip: CommitId,
}

impl Branch {
    pub fn new(name: impl Into<String>, tip: CommitId) -> Self {
        Self {
            name: name.into(),
            tip,
        }
    }
}
