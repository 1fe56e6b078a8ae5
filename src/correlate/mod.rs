//! Correlation engine: ties vulnerability records to releases, commits, and
//! pull requests.

use serde::Serialize;

use crate::github::{Commit, PullRequest};

pub mod prediction;
pub mod release;
pub mod suspected;

pub use prediction::{build_prediction, resolve_pull_request_for_commit};
pub use release::{find_previous_release, find_release_window};
pub use suspected::find_suspected_pull_requests;

/// Predicted introduction/fix points for a vulnerability.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Predicted {
    pub introduced: Option<CommitMatch>,
    pub fixed: Option<CommitMatch>,
    /// Mirrors the introduced commit hash when present. Kept for callers
    /// that only care about a single anchor commit.
    pub commit_hash: String,
}

/// A commit hash with whatever could be resolved around it: the pull request
/// that contains it and the full commit object. Both enrichments are
/// best-effort and may be absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitMatch {
    pub commit_hash: Option<String>,
    pub pull_request: Option<PullRequest>,
    pub commit: Option<Commit>,
}

/// Merged pull requests (and their merge commits) falling inside the
/// release window a vulnerability is believed to have been introduced in.
/// Candidates, not certainties.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Suspected {
    pub commits: Vec<Commit>,
    pub pull_requests: Vec<PullRequest>,
}
