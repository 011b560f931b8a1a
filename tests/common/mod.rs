// Shared test fixtures for integration tests
// Functions here are used across different test files
#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;
use whotouched::repository::MemoryRepository;

/// Create a temporary git repository
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();
    let repo = Repository::init(&repo_path).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

/// Write a tree: `base` plus `files` (nested paths allowed)
fn write_tree(repo: &Repository, base: Option<&git2::Tree<'_>>, files: &[(&str, &[u8])]) -> Oid {
    let mut builder = repo.treebuilder(base).unwrap();
    let mut nested: BTreeMap<&str, Vec<(&str, &[u8])>> = BTreeMap::new();

    for (path, content) in files {
        match path.split_once('/') {
            Some((dir, rest)) => nested.entry(dir).or_default().push((rest, *content)),
            None => {
                let blob = repo.blob(content).unwrap();
                builder.insert(*path, blob, 0o100644).unwrap();
            }
        }
    }

    for (dir, entries) in nested {
        let sub_base = base
            .and_then(|t| t.get_name(dir).map(|e| e.id()))
            .and_then(|id| repo.find_tree(id).ok());
        let sub = write_tree(repo, sub_base.as_ref(), &entries);
        builder.insert(dir, sub, 0o040000).unwrap();
    }

    builder.write().unwrap()
}

/// Create a commit on top of `parents` without touching any ref.
///
/// The tree starts from the first parent's tree with `files` written over it.
/// Author and committer share `email` and `secs`.
pub fn commit(
    repo: &Repository,
    parents: &[Oid],
    files: &[(&str, &[u8])],
    email: &str,
    secs: i64,
) -> Oid {
    let name = email.split('@').next().unwrap();
    let sig = Signature::new(name, email, &Time::new(secs, 0)).unwrap();

    let parent_commits: Vec<git2::Commit<'_>> =
        parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
    let base = parent_commits.first().map(|c| c.tree().unwrap());
    let tree_id = write_tree(repo, base.as_ref(), files);
    let tree = repo.find_tree(tree_id).unwrap();

    let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();
    repo.commit(None, &sig, &sig, "test commit", &tree, &parent_refs)
        .unwrap()
}

/// Point `refs/remotes/<remote>/<name>` at `oid`
pub fn set_remote_branch(repo: &Repository, remote: &str, name: &str, oid: Oid) {
    repo.reference(&format!("refs/remotes/{}/{}", remote, name), oid, true, "test")
        .unwrap();
}

/// Point `refs/heads/<name>` at `oid`
pub fn set_local_branch(repo: &Repository, name: &str, oid: Oid) {
    repo.reference(&format!("refs/heads/{}", name), oid, true, "test")
        .unwrap();
}

/// Two-branch history used by several tests:
///
/// ```text
/// main:    M1(bob, b.py) <- M2(alice, a.py) <- M3(alice, a.py)
/// feature:                  M2 <- F1(alice, c.py)
/// ```
pub fn two_branch_memory_repo() -> MemoryRepository {
    let mut repo = MemoryRepository::new();
    repo.commit("m1", "bob@example.com", 1_000, &[], &["b.py"]);
    repo.commit("m2", "alice@example.com", 2_000, &["m1"], &["a.py"]);
    repo.commit("m3", "alice@example.com", 3_000, &["m2"], &["a.py"]);
    repo.commit("f1", "alice@example.com", 2_500, &["m2"], &["c.py"]);
    repo.remote_branch("origin", "main", "m3")
        .remote_branch("origin", "feature", "f1");
    repo
}
