//! Concurrent multi-branch scanner
//!
//! Answers "who changed which files, on which branches, when" by walking
//! every selected branch in parallel and merging the results.
//!
//! # Architecture
//!
//! The scanner is organized into layers:
//!
//! - **types**: Data passed between layers (BranchHarvest, CancelToken, ScanStats)
//! - **filter**: Compiled branch/file/author/date predicates
//! - **ledger**: Shared set of commits already claimed for reporting
//! - **walker**: Newest-first ancestry walk of a single branch
//! - **merge**: Folds per-branch harvests into one sorted report
//! - **progress**: Progress reporting abstraction
//! - **scanner**: Coordinator owning the bounded worker pool

mod filter;
mod ledger;
mod merge;
mod progress;
mod types;
mod walker;

pub use filter::{FilterCriteria, FilterSet};
pub use ledger::VisitLedger;
pub use merge::merge_harvests;
pub use progress::{IndicatifProgress, NoopProgress, ProgressHandle, ProgressReporter, VerboseProgress};
pub use types::{BranchHarvest, CancelToken, ScanStats};
pub use walker::BranchWalker;

use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{CriteriaError, Result, ScanError};
use crate::model::{Branch, Report};

use super::reader::RepositoryReader;

/// Worker pool size when none is configured
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Scan settings that are not filters
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Remote whose tracking branches are scanned; `None` scans local branches
    pub remote: Option<String>,
    /// Maximum number of branches walked at the same time
    pub max_concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            remote: Some("origin".to_string()),
            max_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ScanOptions {
    pub fn local() -> Self {
        Self {
            remote: None,
            ..Self::default()
        }
    }

    pub fn remote(name: impl Into<String>) -> Self {
        Self {
            remote: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = workers;
        self
    }
}

/// Scan coordinator
///
/// Lists branches, dispatches one walker per selected branch into a pool of
/// `max_concurrency` workers and merges their harvests. A report is returned
/// only if every branch was walked successfully.
pub struct Scanner<R: RepositoryReader + 'static> {
    reader: Arc<R>,
    options: ScanOptions,
    progress: Arc<dyn ProgressReporter>,
    cancel: CancelToken,
    profile: bool,
}

impl<R: RepositoryReader + 'static> Scanner<R> {
    /// Create a quiet scanner (no progress bar)
    pub fn new(reader: R, options: ScanOptions) -> Self {
        Self {
            reader: Arc::new(reader),
            options,
            progress: Arc::new(NoopProgress),
            cancel: CancelToken::new(),
            profile: false,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Log per-phase timings
    pub fn profiling(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    /// Token that aborts any running scan when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub async fn scan(&self, criteria: &FilterCriteria) -> Result<Report> {
        self.scan_with_stats(criteria).await.map(|(report, _)| report)
    }

    pub async fn scan_with_stats(&self, criteria: &FilterCriteria) -> Result<(Report, ScanStats)> {
        let total_start = Instant::now();

        // Phase 1: Validate criteria
        if self.options.max_concurrency == 0 {
            return Err(CriteriaError::ZeroConcurrency.into());
        }
        let filters = Arc::new(FilterSet::compile(criteria)?);

        // Phase 2: List and select branches
        let phase_start = Instant::now();
        let branches = self.list_branches().await?;
        let selected: Vec<Branch> = branches
            .into_iter()
            .filter(|b| filters.branch_matches(&b.name))
            .collect();
        self.profile_phase(&format!("List branches ({} selected)", selected.len()), phase_start);

        if selected.is_empty() {
            return Err(ScanError::NoMatchingBranches {
                pattern: filters.branch_label().to_string(),
            });
        }
        log::info!(
            "Scanning {} branches with up to {} workers",
            selected.len(),
            self.options.max_concurrency
        );

        // Phase 3: Walk branches
        let phase_start = Instant::now();
        let ledger = Arc::new(VisitLedger::new());
        let branch_count = selected.len();
        let harvests = self.walk_branches(selected, &filters, &ledger).await?;
        self.profile_phase(&format!("Walk {} branches", branch_count), phase_start);

        // Phase 4: Merge
        let phase_start = Instant::now();
        let commits_walked = harvests.iter().map(|h| h.commits_walked).sum();
        let report = merge_harvests(harvests);
        self.profile_phase(&format!("Merge ({} records)", report.len()), phase_start);

        let stats = ScanStats {
            branches: branch_count,
            commits_walked,
            commits_claimed: ledger.len(),
            records: report.len(),
        };
        log::info!(
            "Walked {} commits across {} branches, {} matched",
            stats.commits_walked,
            stats.branches,
            stats.records
        );
        self.profile_phase("TOTAL scan", total_start);

        Ok((report, stats))
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        let reader = Arc::clone(&self.reader);
        let remote = self.options.remote.clone();
        let branches = tokio::task::spawn_blocking(move || reader.list_branches(remote.as_deref()))
            .await
            .map_err(|e| ScanError::Worker {
                branch: "(listing)".to_string(),
                message: e.to_string(),
            })??;
        for branch in &branches {
            log::debug!("Found branch {} at {}", branch.name, branch.tip.short());
        }
        Ok(branches)
    }

    /// Run one walker per branch, at most `max_concurrency` at a time.
    ///
    /// The first real failure cancels the remaining walkers and is returned;
    /// the harvests collected so far are dropped.
    async fn walk_branches(
        &self,
        branches: Vec<Branch>,
        filters: &Arc<FilterSet>,
        ledger: &Arc<VisitLedger>,
    ) -> Result<Vec<BranchHarvest>> {
        let cancel = self.cancel.child();
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency));
        let pb = self.progress.start("Walking", branches.len() as u64);

        let mut tasks = JoinSet::new();
        let mut names = FxHashMap::default();
        for branch in branches {
            let name = branch.name.clone();
            let reader = Arc::clone(&self.reader);
            let filters = Arc::clone(filters);
            let ledger = Arc::clone(ledger);
            let cancel = cancel.clone();
            let semaphore = Arc::clone(&semaphore);

            let handle = tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| ScanError::Cancelled)?;
                cancel.check()?;

                let label = branch.name.clone();
                tokio::task::spawn_blocking(move || {
                    BranchWalker::new(reader.as_ref(), &filters, &ledger, &cancel).walk(&branch)
                })
                .await
                .map_err(|e| ScanError::Worker {
                    branch: label,
                    message: e.to_string(),
                })?
            });
            names.insert(handle.id(), name);
        }

        let mut harvests = Vec::with_capacity(names.len());
        let mut failure: Option<ScanError> = None;
        while let Some(joined) = tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, outcome)) => outcome,
                Err(e) => Err(ScanError::Worker {
                    branch: names.get(&e.id()).cloned().unwrap_or_default(),
                    message: e.to_string(),
                }),
            };

            match outcome {
                Ok(harvest) => {
                    pb.branch_done(&harvest.branch);
                    harvests.push(harvest);
                }
                Err(err) => {
                    if !err.is_cancelled() {
                        log::debug!("Branch worker failed, cancelling scan: {}", err);
                    }
                    cancel.cancel();
                    failure = match failure {
                        Some(first) if !(first.is_cancelled() && !err.is_cancelled()) => Some(first),
                        _ => Some(err),
                    };
                }
            }
        }
        pb.finish();

        match failure {
            Some(err) => Err(err),
            None => Ok(harvests),
        }
    }

    fn profile_phase(&self, name: &str, start: Instant) {
        if self.profile {
            log::info!("[PROFILE] {}: {:?}", name, start.elapsed());
        }
    }
}
