//! Prediction building: resolving a record's introduced/fixed commits to
//! pull requests and commit objects.

use crate::error::{Error, Result};
use crate::github::{GithubClient, PullRequest};
use crate::osv::{Vulnerability, extract_fixed_commit, extract_introduced_commit};
use crate::repository::RepoRef;

use super::{CommitMatch, Predicted};

/// Builds a prediction for the record. Never fails: a record without
/// affected entries yields an all-empty result, and every enrichment step
/// degrades to an absent field rather than an error.
pub async fn build_prediction(
    github: &GithubClient,
    repo: &RepoRef,
    vuln: &Vulnerability,
) -> Predicted {
    let mut predicted = Predicted::default();
    if vuln.affected.is_empty() {
        return predicted;
    }

    if let Some(introduced) = extract_introduced_commit(vuln) {
        predicted.commit_hash = introduced.clone();
        predicted.introduced = Some(resolve_commit_match(github, repo, introduced).await);
    }

    if let Some(fixed) = extract_fixed_commit(vuln) {
        predicted.fixed = Some(resolve_commit_match(github, repo, fixed).await);
    }

    predicted
}

async fn resolve_commit_match(
    github: &GithubClient,
    repo: &RepoRef,
    commit_hash: String,
) -> CommitMatch {
    let pull_request = match resolve_pull_request_for_commit(github, repo, &commit_hash).await {
        Ok(pr) => Some(pr),
        Err(err) => {
            tracing::debug!("no pull request resolved for {commit_hash}: {err}");
            None
        }
    };

    let commit = match github.get_commit(repo, &commit_hash).await {
        Ok(commit) => Some(commit),
        Err(err) => {
            tracing::debug!("commit detail fetch for {commit_hash} skipped: {err}");
            None
        }
    };

    CommitMatch {
        commit_hash: Some(commit_hash),
        pull_request,
        commit,
    }
}

/// Resolves the pull request containing the commit: the first entry of the
/// platform's "pull requests with commit" listing, fetched in full by
/// number. Zero entries is [`Error::NoPullRequestForCommit`]; transport
/// failures propagate.
pub async fn resolve_pull_request_for_commit(
    github: &GithubClient,
    repo: &RepoRef,
    commit_hash: &str,
) -> Result<PullRequest> {
    let pulls = github.list_pull_requests_with_commit(repo, commit_hash).await?;

    let Some(first) = pulls.first() else {
        return Err(Error::NoPullRequestForCommit {
            commit: commit_hash.to_string(),
        });
    };

    github.get_pull_request(repo, first.number).await
}
