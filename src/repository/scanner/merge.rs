//! Merge of per-branch harvests into one report

use rustc_hash::FxHashMap;

use crate::model::{CommitId, MatchRecord, Report};

use super::types::BranchHarvest;

/// Fold harvests into a sorted report.
///
/// Each commit has exactly one claimed record; sightings from other branches
/// only add their branch name. The input order does not affect the output.
pub fn merge_harvests(harvests: Vec<BranchHarvest>) -> Report {
    let mut records: FxHashMap<CommitId, MatchRecord> = FxHashMap::default();
    let mut sightings: Vec<(CommitId, String)> = Vec::new();

    for harvest in harvests {
        for record in harvest.claimed {
            match records.get_mut(&record.commit) {
                Some(existing) => {
                    // Only possible when harvests come from different ledgers
                    log::warn!("Commit {} claimed twice, merging", record.commit);
                    existing.branches.extend(record.branches);
                    existing.files.extend(record.files);
                }
                None => {
                    records.insert(record.commit.clone(), record);
                }
            }
        }
        for id in harvest.sightings {
            sightings.push((id, harvest.branch.clone()));
        }
    }

    for (id, branch) in sightings {
        match records.get_mut(&id) {
            Some(record) => {
                record.branches.insert(branch);
            }
            None => log::warn!("Commit {} seen on {} but never claimed", id, branch),
        }
    }

    Report::new(records.into_values().collect())
}
