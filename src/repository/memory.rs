//! In-memory repository
//!
//! Holds a hand-built commit graph. Used by tests and benchmarks, and handy
//! for driving the scanner from data that did not come from git.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::error::{Result, ScanError};
use crate::model::{Branch, Commit, CommitId};

use super::reader::RepositoryReader;

#[derive(Debug, Default)]
pub struct MemoryRepository {
    commits: FxHashMap<CommitId, Arc<Commit>>,
    /// (remote, branch) in insertion order
    branches: Vec<(Option<String>, Branch)>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully specified commit
    pub fn insert(&mut self, commit: Commit) -> CommitId {
        let id = commit.id.clone();
        self.commits.insert(id.clone(), Arc::new(commit));
        id
    }

    /// Add a commit whose author and committer dates are both `secs`
    pub fn commit(
        &mut self,
        id: &str,
        author: &str,
        secs: i64,
        parents: &[&str],
        files: &[&str],
    ) -> CommitId {
        let when = OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let name = author.split('@').next().unwrap_or(author).to_string();
        self.insert(Commit {
            id: CommitId::from(id),
            author: author.to_string(),
            author_name: name,
            timestamp: when,
            committed: when,
            parents: parents.iter().map(|p| CommitId::from(*p)).collect(),
            files: files.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Point a remote-tracking branch at a commit
    pub fn remote_branch(&mut self, remote: &str, name: &str, tip: &str) -> &mut Self {
        self.set_branch(Some(remote.to_string()), name, tip)
    }

    /// Point a local branch at a commit
    pub fn local_branch(&mut self, name: &str, tip: &str) -> &mut Self {
        self.set_branch(None, name, tip)
    }

    fn set_branch(&mut self, remote: Option<String>, name: &str, tip: &str) -> &mut Self {
        self.branches
            .retain(|(r, b)| !(r == &remote && b.name == name));
        self.branches
            .push((remote, Branch::new(name, CommitId::from(tip))));
        self
    }
}

impl RepositoryReader for MemoryRepository {
    fn list_branches(&self, remote: Option<&str>) -> Result<Vec<Branch>> {
        Ok(self
            .branches
            .iter()
            .filter(|(r, _)| r.as_deref() == remote)
            .map(|(_, b)| b.clone())
            .collect())
    }

    fn read_commit(&self, id: &CommitId) -> Result<Arc<Commit>> {
        self.commits
            .get(id)
            .cloned()
            .ok_or_else(|| ScanError::CommitNotFound { id: id.clone() })
    }
}
