// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! Error types for the commit protocol

use std::path::PathBuf;
use thiserror::Error;

/// Result type for commit operations
pub type CommitResult<T> = Result<T, CommitError>;

/// Error types for repository access and commit creation
#[derive(Debug, Error)]
pub enum CommitError {
    /// The repository could not be opened; fatal for this attempt only
    #[error("failed to open repository at {path}: {source}")]
    RepositoryOpen {
        /// Configured repository path
        path: PathBuf,
        /// Underlying libgit2 failure
        #[source]
        source: git2::Error,
    },

    /// The repository has no working tree to write clippings into
    #[error("repository at {0} is bare")]
    BareRepository(PathBuf),

    /// Any other libgit2 failure during the commit protocol
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// Filesystem failure writing the clippings file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
