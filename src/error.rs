//! Error taxonomy shared across the crate.
//!
//! Validation and parsing failures are surfaced immediately; the semantic
//! "no answer" conditions carry the identifiers that were tried so callers
//! can report them without re-deriving context.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be parsed into an `owner/name` pair.
    #[error("invalid repository reference: {0}")]
    InvalidRepositoryReference(String),

    /// The input string does not look like a CVE identifier. Checked
    /// locally, before any network call is made.
    #[error("invalid CVE identifier: {0}")]
    InvalidCveFormat(String),

    /// The vulnerability record carries no parseable repository, neither on
    /// a package name nor on a range `repo` field.
    #[error("no repository information found in vulnerability {vuln_id}")]
    RepositoryNotFound { vuln_id: String },

    /// The vulnerability record lists no affected versions at all.
    #[error("vulnerability {vuln_id} has no affected versions")]
    NoAffectedVersions { vuln_id: String },

    /// None of the affected versions matched a release with a predecessor.
    #[error("no matching release found for affected versions: {versions:?}")]
    NoMatchingRelease { versions: Vec<String> },

    #[error("release list is empty")]
    EmptyReleaseList,

    /// The hosting platform returned zero pull requests for the commit.
    /// This is a semantic no-answer, not a transport failure.
    #[error("no pull request found for commit {commit}")]
    NoPullRequestForCommit { commit: String },

    /// The vulnerability database has no record under the given identifier.
    #[error("vulnerability {0} not found")]
    VulnerabilityNotFound(String),

    /// The merged-PR search window could not be established, either because
    /// its end precedes its start or a release carries no usable timestamp.
    #[error("merged pull request search window is invalid")]
    InvalidTimeWindow,

    /// An upstream service answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: StatusCode, url: String },

    /// Transport-level failure talking to an upstream service.
    #[error("upstream API request failed")]
    Http(#[from] reqwest::Error),
}
