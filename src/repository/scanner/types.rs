//! Domain types for branch scanning
//!
//! These types form the data contract between walkers and the merge step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, ScanError};
use crate::model::{CommitId, MatchRecord};

/// What one branch walk produced
///
/// `claimed` holds full records for commits this walker won in the ledger.
/// `sightings` lists qualifying commits another walker claimed; the merge
/// step adds this branch to their records.
#[derive(Debug, Default)]
pub struct BranchHarvest {
    pub branch: String,
    pub claimed: Vec<MatchRecord>,
    pub sightings: Vec<CommitId>,
    pub commits_walked: usize,
}

impl BranchHarvest {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            ..Self::default()
        }
    }
}

/// Cooperative cancellation flag
///
/// A child token observes its parent's cancellation but cancelling the child
/// leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<AtomicBool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::clone(&self.flag)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
            || self
                .parent
                .as_ref()
                .is_some_and(|p| p.load(Ordering::Acquire))
    }

    /// `Err(Cancelled)` once cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Scan statistics, logged at the end of a scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub branches: usize,
    pub commits_walked: usize,
    pub commits_claimed: usize,
    pub records: usize,
}
