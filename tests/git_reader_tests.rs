// Git reader integration tests
// Tests the gix-backed reader against real (temporary) git repositories

mod common;

use whotouched::ScanError;
use whotouched::model::CommitId;
use whotouched::repository::{GitReader, RepositoryReader};

fn id(oid: git2::Oid) -> CommitId {
    CommitId::new(oid.to_string())
}

#[test]
fn test_lists_remote_branches_without_prefix() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let c1 = common::commit(&repo, &[], &[("a.txt", b"a")], "dev@example.com", 1_000);
    let c2 = common::commit(&repo, &[c1], &[("b.txt", b"b")], "dev@example.com", 2_000);
    common::set_remote_branch(&repo, "origin", "main", c2);
    common::set_remote_branch(&repo, "origin", "feature/login", c1);
    common::set_remote_branch(&repo, "upstream", "main", c1);
    common::set_local_branch(&repo, "wip", c1);

    let reader = GitReader::open(&repo_path).unwrap();

    let origin = reader.list_branches(Some("origin")).unwrap();
    let names: Vec<_> = origin.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["feature/login", "main"]);
    assert_eq!(origin[1].tip, id(c2));

    let upstream = reader.list_branches(Some("upstream")).unwrap();
    assert_eq!(upstream.len(), 1);
    assert_eq!(upstream[0].tip, id(c1));

    let local = reader.list_branches(None).unwrap();
    assert!(local.iter().any(|b| b.name == "wip" && b.tip == id(c1)));
}

#[test]
fn test_remote_head_alias_skipped() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let c1 = common::commit(&repo, &[], &[("a.txt", b"a")], "dev@example.com", 1_000);
    common::set_remote_branch(&repo, "origin", "main", c1);
    repo.reference_symbolic("refs/remotes/origin/HEAD", "refs/remotes/origin/main", true, "test")
        .unwrap();

    let reader = GitReader::open(&repo_path).unwrap();
    let branches = reader.list_branches(Some("origin")).unwrap();
    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["main"]);
}

#[test]
fn test_reads_commit_metadata() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let c1 = common::commit(&repo, &[], &[("a.txt", b"a")], "alice@example.com", 1_700_000_000);
    let c2 = common::commit(&repo, &[c1], &[("b.txt", b"b")], "bob@example.com", 1_700_000_100);

    let reader = GitReader::open(&repo_path).unwrap();
    let commit = reader.read_commit(&id(c2)).unwrap();

    assert_eq!(commit.id, id(c2));
    assert_eq!(commit.author, "bob@example.com");
    assert_eq!(commit.author_name, "bob");
    assert_eq!(commit.timestamp.unix_timestamp(), 1_700_000_100);
    assert_eq!(commit.committed.unix_timestamp(), 1_700_000_100);
    assert_eq!(commit.parents, vec![id(c1)]);
    assert_eq!(reader.parents(&id(c1)).unwrap(), Vec::<CommitId>::new());
}

#[test]
fn test_changed_files_against_parent() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let c1 = common::commit(
        &repo,
        &[],
        &[("keep.txt", b"same"), ("src/lib.rs", b"v1"), ("docs/a.md", b"a")],
        "dev@example.com",
        1_000,
    );
    let c2 = common::commit(
        &repo,
        &[c1],
        &[("src/lib.rs", b"v2"), ("src/new.rs", b"new")],
        "dev@example.com",
        2_000,
    );

    let reader = GitReader::open(&repo_path).unwrap();

    let root = reader.read_commit(&id(c1)).unwrap();
    assert_eq!(root.files, vec!["docs/a.md", "keep.txt", "src/lib.rs"]);

    let child = reader.read_commit(&id(c2)).unwrap();
    assert_eq!(child.files, vec!["src/lib.rs", "src/new.rs"]);
}

#[test]
fn test_deleted_file_counts_as_changed() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let c1 = common::commit(&repo, &[], &[("gone.txt", b"x"), ("stay.txt", b"y")], "dev@example.com", 1_000);

    // Rebuild the tree without gone.txt
    let sig = git2::Signature::new("dev", "dev@example.com", &git2::Time::new(2_000, 0)).unwrap();
    let parent = repo.find_commit(c1).unwrap();
    let mut builder = repo.treebuilder(Some(&parent.tree().unwrap())).unwrap();
    builder.remove("gone.txt").unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let c2 = repo.commit(None, &sig, &sig, "delete", &tree, &[&parent]).unwrap();

    let reader = GitReader::open(&repo_path).unwrap();
    assert_eq!(reader.read_commit(&id(c2)).unwrap().files, vec!["gone.txt"]);
}

#[test]
fn test_merge_only_credits_resolutions() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let base = common::commit(&repo, &[], &[("shared.txt", b"base")], "dev@example.com", 1_000);
    let left = common::commit(&repo, &[base], &[("left.txt", b"l")], "left@example.com", 2_000);
    let right = common::commit(&repo, &[base], &[("right.txt", b"r")], "right@example.com", 2_100);
    // Merge takes left's tree, adds right.txt, and edits shared.txt itself
    let merge = common::commit(
        &repo,
        &[left, right],
        &[("right.txt", b"r"), ("shared.txt", b"resolved")],
        "merger@example.com",
        3_000,
    );

    let reader = GitReader::open(&repo_path).unwrap();
    let commit = reader.read_commit(&id(merge)).unwrap();
    assert_eq!(commit.parents, vec![id(left), id(right)]);
    assert_eq!(commit.files, vec!["shared.txt"]);
}

#[test]
fn test_unknown_commit_is_not_found() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    common::commit(&repo, &[], &[("a.txt", b"a")], "dev@example.com", 1_000);
    let reader = GitReader::open(&repo_path).unwrap();

    let missing = CommitId::new("0123456789012345678901234567890123456789");
    assert!(matches!(
        reader.read_commit(&missing),
        Err(ScanError::CommitNotFound { .. })
    ));

    let garbage = CommitId::new("not-a-hash");
    assert!(matches!(
        reader.read_commit(&garbage),
        Err(ScanError::CommitNotFound { .. })
    ));
}

#[test]
fn test_commits_are_cached() {
    let (_dir, repo_path, repo) = common::create_test_repo();
    let c1 = common::commit(&repo, &[], &[("a.txt", b"a")], "dev@example.com", 1_000);

    let reader = GitReader::open(&repo_path).unwrap();
    let first = reader.read_commit(&id(c1)).unwrap();
    let second = reader.read_commit(&id(c1)).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(reader.cached_commits(), 1);
}

#[test]
fn test_open_non_repository_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = GitReader::open(dir.path()).err().unwrap();
    assert!(matches!(err, ScanError::Repository { .. }));
}
