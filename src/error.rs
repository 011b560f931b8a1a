//! Error types for scanning
//!
//! `CriteriaError` is raised before any traversal starts. `ScanError` is what
//! a scan returns: either a rejected criteria, an empty branch selection, or a
//! repository failure surfaced by one of the branch workers.

use std::fmt;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::CommitId;

pub type Result<T, E = ScanError> = std::result::Result<T, E>;

/// Which criteria a pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Branch,
    ExcludeBranch,
    File,
    ExcludeFile,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PatternKind::Branch => "branch",
            PatternKind::ExcludeBranch => "excluded branch",
            PatternKind::File => "file",
            PatternKind::ExcludeFile => "excluded file",
        };
        f.write_str(label)
    }
}

/// Rejected filter criteria
#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("invalid {kind} pattern `{pattern}`: {source}")]
    InvalidPattern {
        kind: PatternKind,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("after date {after} must be earlier than before date {before}")]
    EmptyWindow {
        after: OffsetDateTime,
        before: OffsetDateTime,
    },

    #[error("worker pool size must be at least 1")]
    ZeroConcurrency,
}

/// Errors returned by a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid criteria: {0}")]
    InvalidCriteria(#[from] CriteriaError),

    /// Zero branches survived the name filter; callers decide whether that is fatal
    #[error("no branches match {pattern}")]
    NoMatchingBranches { pattern: String },

    #[error("commit not found: {id}")]
    CommitNotFound { id: CommitId },

    #[error("repository read failed: {context}")]
    Repository {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("scan cancelled")]
    Cancelled,

    #[error("worker for branch {branch} failed: {message}")]
    Worker { branch: String, message: String },
}

impl ScanError {
    pub fn repository(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        ScanError::Repository {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScanError::Cancelled)
    }
}
