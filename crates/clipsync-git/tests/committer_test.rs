// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! Integration tests for the idempotent commit protocol

use clipsync_git::{CommitOutcome, Committer};
use std::fs;
use tempfile::TempDir;

/// Initialize a non-bare repository for testing
fn init_repo() -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    git2::Repository::init(temp.path()).expect("init repository");
    temp
}

fn commit_count(repo_path: &std::path::Path) -> usize {
    let repo = git2::Repository::open(repo_path).expect("open repository");
    let mut revwalk = repo.revwalk().expect("revwalk");
    revwalk.push_head().expect("push head");
    revwalk.count()
}

#[test]
fn test_first_commit_has_zero_parents() {
    let repo_dir = init_repo();
    let committer = Committer::new(repo_dir.path());

    let outcome = committer.commit("B012ABCD1234", "first highlight\n").unwrap();
    assert!(outcome.committed);

    let repo = git2::Repository::open(repo_dir.path()).unwrap();
    let commit_id = outcome.commit_id.expect("commit id");
    let commit = repo
        .find_commit(git2::Oid::from_str(&commit_id).unwrap())
        .unwrap();
    assert_eq!(commit.parent_count(), 0);
    assert_eq!(commit.message(), Some("add clippings for B012ABCD1234"));
    assert_eq!(commit.author().name(), Some("clipsync"));
}

#[test]
fn test_identical_content_is_a_history_noop() {
    let repo_dir = init_repo();
    let committer = Committer::new(repo_dir.path());

    let first = committer.commit("B012ABCD1234", "same text\n").unwrap();
    assert!(first.committed);

    let second = committer.commit("B012ABCD1234", "same text\n").unwrap();
    assert_eq!(second, CommitOutcome::unchanged());
    assert_eq!(commit_count(repo_dir.path()), 1);
}

#[test]
fn test_changed_content_chains_a_second_commit() {
    let repo_dir = init_repo();
    let committer = Committer::new(repo_dir.path());

    let first = committer.commit("B012ABCD1234", "text A\n").unwrap();
    let second = committer.commit("B012ABCD1234", "text B\n").unwrap();
    assert!(second.committed);
    assert_eq!(commit_count(repo_dir.path()), 2);

    let repo = git2::Repository::open(repo_dir.path()).unwrap();
    let second_commit = repo
        .find_commit(git2::Oid::from_str(&second.commit_id.unwrap()).unwrap())
        .unwrap();
    assert_eq!(second_commit.parent_count(), 1);
    assert_eq!(
        second_commit.parent(0).unwrap().id().to_string(),
        first.commit_id.unwrap()
    );
}

#[test]
fn test_working_tree_reflects_latest_payload() {
    let repo_dir = init_repo();
    let committer = Committer::new(repo_dir.path());

    committer.commit("B012ABCD1234", "old\n").unwrap();
    committer.commit("B012ABCD1234", "new\n").unwrap();

    let content = fs::read_to_string(repo_dir.path().join("B012ABCD1234").join("clippings.txt")).unwrap();
    assert_eq!(content, "new\n");
}

#[test]
fn test_distinct_serials_get_distinct_files() {
    let repo_dir = init_repo();
    let committer = Committer::new(repo_dir.path());

    committer.commit("B012ABCD1234", "device one\n").unwrap();
    let outcome = committer.commit("C098WXYZ7654", "device two\n").unwrap();
    assert!(outcome.committed);

    assert!(repo_dir.path().join("B012ABCD1234").join("clippings.txt").exists());
    assert!(repo_dir.path().join("C098WXYZ7654").join("clippings.txt").exists());
    assert_eq!(commit_count(repo_dir.path()), 2);
}

#[test]
fn test_head_advances_to_new_commit() {
    let repo_dir = init_repo();
    let committer = Committer::new(repo_dir.path());

    let outcome = committer.commit("B012ABCD1234", "highlight\n").unwrap();

    let repo = git2::Repository::open(repo_dir.path()).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.id().to_string(), outcome.commit_id.unwrap());
}
