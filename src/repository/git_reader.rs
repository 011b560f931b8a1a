//! Git repository reader backed by gix
//!
//! Reads branch tips and commits straight from the object database. Changed
//! files are derived by flattening the commit tree and its parents' trees and
//! comparing blob ids per path.

use anyhow::{Context, Result as AnyResult};
use gix::ObjectId;
use gix::bstr::BString;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use time::OffsetDateTime;

use crate::error::{Result, ScanError};
use crate::model::{Branch, Commit, CommitId};

use super::reader::RepositoryReader;

/// Thread-safe reader over an on-disk repository
///
/// Each call works on its own thread-local handle, so one reader can serve
/// every branch worker. Commits are cached once read: branches that share
/// history never diff the same trees twice.
pub struct GitReader {
    repo: gix::ThreadSafeRepository,
    path: PathBuf,
    cache: Mutex<FxHashMap<CommitId, Arc<Commit>>>,
}

impl GitReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let repo = gix::open(&path).map_err(|e| {
            ScanError::repository(format!("opening repository at {}", path.display()), e)
        })?;
        Ok(Self {
            repo: repo.into_sync(),
            path,
            cache: Mutex::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of commits read so far
    pub fn cached_commits(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn load_commit(&self, id: &CommitId) -> Result<Commit> {
        let repo = self.repo.to_thread_local();
        let oid = ObjectId::from_hex(id.as_str().as_bytes())
            .map_err(|_| ScanError::CommitNotFound { id: id.clone() })?;
        let commit = repo.find_commit(oid).map_err(|e| {
            log::debug!("find_commit({}) failed: {}", id, e);
            ScanError::CommitNotFound { id: id.clone() }
        })?;

        let author = commit
            .author()
            .map_err(|e| ScanError::repository(format!("decoding author of {}", id), e))?;
        let committer = commit
            .committer()
            .map_err(|e| ScanError::repository(format!("decoding committer of {}", id), e))?;

        let parents: Vec<ObjectId> = commit.parent_ids().map(|p| p.detach()).collect();
        let files = changed_files(&repo, &commit, &parents)
            .map_err(|e| ScanError::repository(format!("listing changed files of {}", id), e))?;

        Ok(Commit {
            id: id.clone(),
            author: author.email.to_string(),
            author_name: author.name.to_string(),
            timestamp: to_datetime(author.seconds(), id)?,
            committed: to_datetime(committer.seconds(), id)?,
            parents: parents.into_iter().map(CommitId::from).collect(),
            files,
        })
    }
}

impl RepositoryReader for GitReader {
    fn list_branches(&self, remote: Option<&str>) -> Result<Vec<Branch>> {
        let repo = self.repo.to_thread_local();
        let platform = repo
            .references()
            .map_err(|e| ScanError::repository("opening reference store", e))?;
        let refs = match remote {
            Some(_) => platform.remote_branches(),
            None => platform.local_branches(),
        }
        .map_err(|e| ScanError::repository("listing branches", e))?;

        let prefix = remote.map(|r| format!("{}/", r));
        let mut branches = Vec::new();
        for reference in refs {
            let mut reference =
                reference.map_err(|e| ScanError::repository("reading reference", e))?;
            let short = reference.name().shorten().to_string();
            let name = match &prefix {
                Some(prefix) => match short.strip_prefix(prefix.as_str()) {
                    Some(name) => name.to_string(),
                    None => continue,
                },
                None => short,
            };
            // origin/HEAD is a symbolic alias of another branch
            if name == "HEAD" {
                continue;
            }
            let tip = reference
                .peel_to_id_in_place()
                .map_err(|e| ScanError::repository(format!("resolving branch {}", name), e))?;
            branches.push(Branch::new(name, CommitId::from(tip.detach())));
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn read_commit(&self, id: &CommitId) -> Result<Arc<Commit>> {
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok(Arc::clone(hit));
        }

        // Two workers may load the same commit concurrently; the first insert wins.
        let loaded = Arc::new(self.load_commit(id)?);
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(id.clone()).or_insert(loaded)))
    }
}

fn to_datetime(seconds: i64, id: &CommitId) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| ScanError::repository(format!("timestamp of {} out of range", id), e))
}

/// Flatten a tree into path -> blob id
fn blob_paths(tree: &gix::Tree<'_>) -> AnyResult<FxHashMap<BString, ObjectId>> {
    let mut recorder = gix::traverse::tree::Recorder::default();
    tree.traverse()
        .breadthfirst(&mut recorder)
        .context("Failed to traverse tree")?;

    Ok(recorder
        .records
        .into_iter()
        .filter(|entry| !entry.mode.is_tree())
        .map(|entry| (entry.filepath, entry.oid))
        .collect())
}

/// Paths a commit changed relative to its parents.
///
/// Root commits changed everything they contain. Merges only count paths that
/// differ from every parent, so the side branch's work stays with its authors.
fn changed_files(
    repo: &gix::Repository,
    commit: &gix::Commit<'_>,
    parents: &[ObjectId],
) -> AnyResult<Vec<String>> {
    let tree = commit.tree().context("Failed to get commit tree")?;
    let current = blob_paths(&tree)?;

    let mut parent_maps = Vec::with_capacity(parents.len());
    for parent in parents {
        let parent_tree = repo
            .find_commit(*parent)
            .with_context(|| format!("Failed to find parent {}", parent))?
            .tree()
            .context("Failed to get parent tree")?;
        parent_maps.push(blob_paths(&parent_tree)?);
    }

    if parent_maps.is_empty() {
        let mut files: Vec<String> = current.keys().map(|p| p.to_string()).collect();
        files.sort();
        return Ok(files);
    }

    let candidates: FxHashSet<&BString> = current
        .keys()
        .chain(parent_maps.iter().flat_map(|m| m.keys()))
        .collect();

    let mut files: Vec<String> = candidates
        .into_iter()
        .filter(|path| {
            let ours = current.get(*path);
            parent_maps.iter().all(|theirs| theirs.get(*path) != ours)
        })
        .map(|path| path.to_string())
        .collect();
    files.sort();
    Ok(files)
}
