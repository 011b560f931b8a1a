mod commit;
mod report;

pub use commit::{Branch, Commit, CommitId};
pub use report::{MatchRecord, Report};
