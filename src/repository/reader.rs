//! Repository reader trait
//!
//! Decouples the scan engine from where commits come from.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{Branch, Commit, CommitId};

/// Read-only access to branches and commit history
///
/// Implementations are shared by every branch worker, so all methods take
/// `&self` and must be safe to call from several threads at once.
pub trait RepositoryReader: Send + Sync {
    /// List branch tips. `Some(remote)` lists that remote's tracking
    /// branches (names without the remote prefix), `None` lists local ones.
    fn list_branches(&self, remote: Option<&str>) -> Result<Vec<Branch>>;

    /// Direct parents of a commit, empty for a root commit
    fn parents(&self, id: &CommitId) -> Result<Vec<CommitId>> {
        Ok(self.read_commit(id)?.parents.clone())
    }

    /// Read commit metadata and its changed files.
    ///
    /// Fails with `ScanError::CommitNotFound` for an unknown id.
    fn read_commit(&self, id: &CommitId) -> Result<Arc<Commit>>;
}
