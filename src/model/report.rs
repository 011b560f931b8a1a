use serde::Serialize;
use std::collections::BTreeSet;
use time::OffsetDateTime;

use super::CommitId;

/// One qualifying commit with its originating branches and matching files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub commit: CommitId,
    pub author: String,
    pub author_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub branches: BTreeSet<String>,
    pub files: BTreeSet<String>,
}

/// Final scan output, sorted by (timestamp, commit id)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    records: Vec<MatchRecord>,
}

impl Report {
    pub fn new(mut records: Vec<MatchRecord>) -> Self {
        records.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.commit.cmp(&b.commit))
        });
        Self { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, commit: &str) -> Option<&MatchRecord> {
        self.records.iter().find(|r| r.commit.as_str() == commit)
    }
}

impl IntoIterator for Report {
    type Item = MatchRecord;
    type IntoIter = std::vec::IntoIter<MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
