//! Branch walker
//!
//! Explores the ancestry of one branch tip, newest commit first, and reports
//! the commits that pass every filter.

use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Branch, Commit, CommitId, MatchRecord};
use crate::repository::reader::RepositoryReader;

use super::filter::FilterSet;
use super::ledger::VisitLedger;
use super::types::{BranchHarvest, CancelToken};

/// Frontier entry ordered by committer time, then id, so the heap pops the
/// most recent commit first and ties break deterministically
struct Pending(Arc<Commit>);

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .committed
            .cmp(&other.0.committed)
            .then_with(|| self.0.id.cmp(&other.0.id))
    }
}

pub struct BranchWalker<'a, R: RepositoryReader + ?Sized> {
    reader: &'a R,
    filters: &'a FilterSet,
    ledger: &'a VisitLedger,
    cancel: &'a CancelToken,
}

impl<'a, R: RepositoryReader + ?Sized> BranchWalker<'a, R> {
    pub fn new(
        reader: &'a R,
        filters: &'a FilterSet,
        ledger: &'a VisitLedger,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            reader,
            filters,
            ledger,
            cancel,
        }
    }

    /// Walk `branch` to exhaustion.
    ///
    /// Every commit is queued at most once per walk, which also collapses merge
    /// diamonds. A commit committed before the window's lower bound is still
    /// evaluated, since its author date may fall inside the window, but its
    /// parents are not expanded.
    pub fn walk(&self, branch: &Branch) -> Result<BranchHarvest> {
        let mut harvest = BranchHarvest::new(branch.name.clone());
        let mut queued: FxHashSet<CommitId> = FxHashSet::default();
        let mut frontier = BinaryHeap::new();

        queued.insert(branch.tip.clone());
        frontier.push(Pending(self.reader.read_commit(&branch.tip)?));

        while let Some(Pending(commit)) = frontier.pop() {
            self.cancel.check()?;
            harvest.commits_walked += 1;

            self.evaluate(&commit, &mut harvest);

            if self.filters.before_window(commit.committed) {
                continue;
            }
            for parent in self.reader.parents(&commit.id)? {
                if queued.insert(parent.clone()) {
                    frontier.push(Pending(self.reader.read_commit(&parent)?));
                }
            }
        }

        log::debug!(
            "Branch {}: walked {} commits, claimed {}, seen elsewhere {}",
            harvest.branch,
            harvest.commits_walked,
            harvest.claimed.len(),
            harvest.sightings.len()
        );
        Ok(harvest)
    }

    /// Apply author/window/file filters and record a qualifying commit
    fn evaluate(&self, commit: &Commit, harvest: &mut BranchHarvest) {
        if !self.filters.author_matches(&commit.author) || !self.filters.in_window(commit.timestamp) {
            return;
        }

        let files: BTreeSet<String> = commit
            .files
            .iter()
            .filter(|path| self.filters.file_matches(path))
            .cloned()
            .collect();
        if self.filters.filters_files() && files.is_empty() {
            return;
        }

        if self.ledger.try_claim(&commit.id) {
            harvest.claimed.push(MatchRecord {
                commit: commit.id.clone(),
                author: commit.author.clone(),
                author_name: commit.author_name.clone(),
                timestamp: commit.timestamp,
                branches: BTreeSet::from([harvest.branch.clone()]),
                files,
            });
        } else {
            harvest.sightings.push(commit.id.clone());
        }
    }
}
