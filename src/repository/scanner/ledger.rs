//! Commit visitation ledger
//!
//! The one piece of mutable state shared between branch workers: the set of
//! commit ids that have already been claimed for reporting.

use rustc_hash::FxHashSet;
use std::sync::{Mutex, PoisonError};

use crate::model::CommitId;

#[derive(Debug, Default)]
pub struct VisitLedger {
    claimed: Mutex<FxHashSet<CommitId>>,
}

impl VisitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for the caller. Returns true for exactly one caller per id.
    pub fn try_claim(&self, id: &CommitId) -> bool {
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.contains(id) {
            return false;
        }
        claimed.insert(id.clone())
    }

    pub fn is_claimed(&self, id: &CommitId) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Number of claimed commits
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
