// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! The idempotent commit protocol.
//!
//! One [`Committer::commit`] call owns the repository for the duration of a
//! single attempt: write the clippings file, refresh and checksum the
//! staging index, stage everything, checksum again, and create a commit
//! only when the two checksums differ. The branch head is advanced by the
//! commit itself; a repository without any commit yet yields a parentless
//! initial commit.
//!
//! A repository with unresolved merge conflicts is outside this tool's
//! operating assumptions and is not handled.

use crate::error::{CommitError, CommitResult};
use git2::{ErrorCode, Index, IndexAddOption, Repository, Signature};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Fixed bot identity used as author and committer
pub const SIGNATURE_NAME: &str = "clipsync";

/// Fixed bot address used as author and committer
pub const SIGNATURE_EMAIL: &str = "clipsync@localhost";

/// File name the clippings are persisted under, per device serial
pub const CLIPPINGS_FILE: &str = "clippings.txt";

/// Terminal result of one commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Whether a new commit object was created
    pub committed: bool,

    /// Hex id of the new commit, when one was created
    pub commit_id: Option<String>,
}

impl CommitOutcome {
    /// Outcome for an attempt that changed nothing (or failed)
    pub fn unchanged() -> Self {
        CommitOutcome {
            committed: false,
            commit_id: None,
        }
    }
}

/// Commits clippings into a repository, one attempt at a time.
///
/// Holds no repository state between attempts; the repository is opened,
/// mutated and released per invocation.
#[derive(Debug, Clone)]
pub struct Committer {
    repo_path: PathBuf,
}

impl Committer {
    /// Create a committer for the repository at `repo_path`
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Committer {
            repo_path: repo_path.into(),
        }
    }

    /// The configured repository path
    pub fn repo_path(&self) -> &PathBuf {
        &self.repo_path
    }

    /// Persist `text` for `serial` and commit it if its content changed.
    ///
    /// Writes `<workdir>/<serial>/clippings.txt` (full overwrite), stages
    /// all working-tree changes, and creates a commit chained to the
    /// current branch head, or a parentless initial commit when the
    /// repository has none. Returns `committed: false` without creating a
    /// commit object when the staged content is byte-identical to what is
    /// already committed.
    pub fn commit(&self, serial: &str, text: &str) -> CommitResult<CommitOutcome> {
        let repo = Repository::open(&self.repo_path).map_err(|source| CommitError::RepositoryOpen {
            path: self.repo_path.clone(),
            source,
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| CommitError::BareRepository(self.repo_path.clone()))?;

        let device_dir = workdir.join(serial);
        fs::create_dir_all(&device_dir)?;
        fs::write(device_dir.join(CLIPPINGS_FILE), text)?;

        let mut index = repo.index()?;
        index.read(true)?;

        let checksum_before = index_checksum(&index);
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let checksum_after = index_checksum(&index);

        if checksum_before == checksum_after {
            debug!("index unchanged for {}, nothing to commit", serial);
            return Ok(CommitOutcome::unchanged());
        }
        debug!(
            "index changed for {}: {} -> {}",
            serial,
            hex::encode(checksum_before),
            hex::encode(checksum_after)
        );

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let parent = head_commit(&repo)?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let signature = Signature::now(SIGNATURE_NAME, SIGNATURE_EMAIL)?;
        let message = format!("add clippings for {serial}");
        let commit_id = repo.commit(Some("HEAD"), &signature, &signature, &message, &tree, &parents)?;

        info!("created commit {} for {}", commit_id, serial);
        Ok(CommitOutcome {
            committed: true,
            commit_id: Some(commit_id.to_string()),
        })
    }

    /// Component-boundary wrapper: any failure is logged and degrades to a
    /// non-committed outcome, so one device's commit failure never crashes
    /// the watching process.
    pub fn try_commit(&self, serial: &str, text: &str) -> CommitOutcome {
        match self.commit(serial, text) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("commit failed for {}: {}", serial, e);
                CommitOutcome::unchanged()
            }
        }
    }
}

/// Resolve the current branch head, treating its absence (first-ever
/// commit) as "no parent" rather than an error.
fn head_commit(repo: &Repository) -> CommitResult<Option<git2::Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Content checksum of the staging index.
///
/// Hashes each entry's path, blob id and mode. Stat-cache data is excluded
/// because it churns when identical bytes are rewritten.
fn index_checksum(index: &Index) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for entry in index.iter() {
        hasher.update(&entry.path);
        hasher.update(entry.id.as_bytes());
        hasher.update(entry.mode.to_le_bytes());
    }
    hasher.finalize().into()
}
