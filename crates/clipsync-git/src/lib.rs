// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 Clipsync Contributors

//! # Clipsync Git Layer
//!
//! Persists extracted clippings into a version-controlled repository with an
//! idempotent commit protocol: the clippings file is written at
//! `<serial>/clippings.txt`, staged, and committed only when its content
//! actually changed since the last commit. Re-running against unchanged
//! device content is a no-op in history.
//!
//! Change detection uses a content checksum of the staging index (path, blob
//! id and mode per entry) taken before and after staging, so stat-cache
//! churn from rewriting identical bytes never produces an empty commit.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clipsync_git::Committer;
//!
//! let committer = Committer::new("/home/me/clippings-repo");
//! let outcome = committer.commit("B012ABCD1234", "my highlights\n")?;
//! if outcome.committed {
//!     println!("created {}", outcome.commit_id.unwrap_or_default());
//! }
//! # Ok::<(), clipsync_git::CommitError>(())
//! ```

pub mod committer;
pub mod error;

pub use committer::{CommitOutcome, Committer, SIGNATURE_EMAIL, SIGNATURE_NAME};
pub use error::{CommitError, CommitResult};
