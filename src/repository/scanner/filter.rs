//! Compiled filter predicates
//!
//! Built once per scan from `FilterCriteria`, then shared read-only by every
//! branch worker.

use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;
use time::OffsetDateTime;

use crate::error::{CriteriaError, PatternKind};

/// User-supplied selection criteria
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Author e-mails to keep; empty keeps everyone
    pub owners: Vec<String>,
    /// Branch name patterns, any of which may match; empty matches all
    pub branches: Vec<String>,
    pub exclude_branches: Vec<String>,
    /// Changed-file patterns, any of which may match; empty matches all
    pub files: Vec<String>,
    pub exclude_files: Vec<String>,
    /// Inclusive lower bound
    pub after: Option<OffsetDateTime>,
    /// Exclusive upper bound
    pub before: Option<OffsetDateTime>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, email: impl Into<String>) -> Self {
        self.owners.push(email.into());
        self
    }

    pub fn branch(mut self, pattern: impl Into<String>) -> Self {
        self.branches.push(pattern.into());
        self
    }

    pub fn exclude_branch(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_branches.push(pattern.into());
        self
    }

    pub fn file(mut self, pattern: impl Into<String>) -> Self {
        self.files.push(pattern.into());
        self
    }

    pub fn exclude_file(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_files.push(pattern.into());
        self
    }

    pub fn after(mut self, when: OffsetDateTime) -> Self {
        self.after = Some(when);
        self
    }

    pub fn before(mut self, when: OffsetDateTime) -> Self {
        self.before = Some(when);
        self
    }
}

/// Any-of pattern list; `None` means no patterns were given
#[derive(Debug)]
struct PatternList(Option<Regex>);

impl PatternList {
    fn compile(patterns: &[String], kind: PatternKind) -> Result<Self, CriteriaError> {
        if patterns.is_empty() {
            return Ok(Self(None));
        }
        // Compile each alone first so the error points at the culprit
        for pattern in patterns {
            build(pattern).map_err(|source| CriteriaError::InvalidPattern {
                kind,
                pattern: pattern.clone(),
                source,
            })?;
        }
        let joined = patterns
            .iter()
            .map(|p| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|");
        let regex = build(&joined).map_err(|source| CriteriaError::InvalidPattern {
            kind,
            pattern: joined.clone(),
            source,
        })?;
        Ok(Self(Some(regex)))
    }

    fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Whether `text` matches; `default` when no patterns were given
    fn matches_or(&self, text: &str, default: bool) -> bool {
        self.0.as_ref().map_or(default, |re| re.is_match(text))
    }
}

fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

fn normalize_email(email: &str) -> String {
    email
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .to_ascii_lowercase()
}

/// Immutable, pre-compiled predicates
#[derive(Debug)]
pub struct FilterSet {
    owners: FxHashSet<String>,
    branches: PatternList,
    exclude_branches: PatternList,
    files: PatternList,
    exclude_files: PatternList,
    after: Option<OffsetDateTime>,
    before: Option<OffsetDateTime>,
    branch_label: String,
}

impl FilterSet {
    pub fn compile(criteria: &FilterCriteria) -> Result<Self, CriteriaError> {
        if let (Some(after), Some(before)) = (criteria.after, criteria.before) {
            if after >= before {
                return Err(CriteriaError::EmptyWindow { after, before });
            }
        }

        let mut branch_label = if criteria.branches.is_empty() {
            "`.*`".to_string()
        } else {
            quoted(&criteria.branches)
        };
        if !criteria.exclude_branches.is_empty() {
            branch_label.push_str(" excluding ");
            branch_label.push_str(&quoted(&criteria.exclude_branches));
        }

        Ok(Self {
            owners: criteria.owners.iter().map(|o| normalize_email(o)).collect(),
            branches: PatternList::compile(&criteria.branches, PatternKind::Branch)?,
            exclude_branches: PatternList::compile(
                &criteria.exclude_branches,
                PatternKind::ExcludeBranch,
            )?,
            files: PatternList::compile(&criteria.files, PatternKind::File)?,
            exclude_files: PatternList::compile(&criteria.exclude_files, PatternKind::ExcludeFile)?,
            after: criteria.after,
            before: criteria.before,
            branch_label,
        })
    }

    pub fn branch_matches(&self, name: &str) -> bool {
        self.branches.matches_or(name, true) && !self.exclude_branches.matches_or(name, false)
    }

    pub fn file_matches(&self, path: &str) -> bool {
        self.files.matches_or(path, true) && !self.exclude_files.matches_or(path, false)
    }

    pub fn author_matches(&self, identity: &str) -> bool {
        self.owners.is_empty() || self.owners.contains(&normalize_email(identity))
    }

    pub fn in_window(&self, when: OffsetDateTime) -> bool {
        self.after.is_none_or(|after| when >= after) && self.before.is_none_or(|before| when < before)
    }

    /// True when `when` lies before the lower bound. Ancestors are never newer,
    /// so a walk can stop descending here.
    pub fn before_window(&self, when: OffsetDateTime) -> bool {
        self.after.is_some_and(|after| when < after)
    }

    /// Whether any file pattern is in effect
    pub fn filters_files(&self) -> bool {
        self.files.is_set() || self.exclude_files.is_set()
    }

    /// Human-readable branch selection, for messages
    pub fn branch_label(&self) -> &str {
        &self.branch_label
    }
}

fn quoted(patterns: &[String]) -> String {
    patterns
        .iter()
        .map(|p| format!("`{}`", p))
        .collect::<Vec<_>>()
        .join(", ")
}
