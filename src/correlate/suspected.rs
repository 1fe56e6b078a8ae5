//! Suspected pull-request discovery: every pull request merged inside the
//! release window a vulnerability was introduced in is a candidate.

use futures::future::join_all;

use crate::error::Result;
use crate::github::{Commit, GithubClient, Issue, PullRequest};
use crate::osv::Vulnerability;
use crate::repository::RepoRef;
use crate::version::release_time;

use super::{Suspected, release::find_release_window};

/// Collects the merged pull requests (and their merge commits) between the
/// last release without the vulnerability and the first affected release.
///
/// The PR and commit fetches are best-effort: individual failures are
/// skipped, never failing the whole query.
pub async fn find_suspected_pull_requests(
    github: &GithubClient,
    repo: &RepoRef,
    vuln: &Vulnerability,
) -> Result<Suspected> {
    let releases = github.list_releases(repo, true).await?;
    let (matched, previous) = find_release_window(vuln, &releases)?;

    let (Some(start), Some(end)) = (release_time(previous), release_time(matched)) else {
        return Err(crate::error::Error::InvalidTimeWindow);
    };

    tracing::info!(
        "searching {repo} for pull requests merged between {} ({}) and {} ({})",
        previous.tag_name,
        start,
        matched.tag_name,
        end,
    );

    let issues = github.search_merged_pull_requests(repo, start, end).await?;
    let pull_requests = resolve_pull_requests_from_issues(github, repo, &issues).await;
    let commits = resolve_commits_from_pull_requests(github, repo, &pull_requests).await;

    Ok(Suspected {
        commits,
        pull_requests,
    })
}

/// Fetches the full pull request behind every PR-linked search result,
/// silently skipping issues that are not pull requests and fetches that
/// fail.
pub async fn resolve_pull_requests_from_issues(
    github: &GithubClient,
    repo: &RepoRef,
    issues: &[Issue],
) -> Vec<PullRequest> {
    let fetches = issues
        .iter()
        .filter(|issue| issue.pull_request.is_some())
        .map(|issue| async move {
            match github.get_pull_request(repo, issue.number).await {
                Ok(pr) => Some(pr),
                Err(err) => {
                    tracing::warn!("skipping pull request #{}: {err}", issue.number);
                    None
                }
            }
        });

    join_all(fetches).await.into_iter().flatten().collect()
}

/// Fetches the merge commit of every pull request that has one, skipping
/// pull requests without a merge-commit SHA and fetches that fail.
pub async fn resolve_commits_from_pull_requests(
    github: &GithubClient,
    repo: &RepoRef,
    pull_requests: &[PullRequest],
) -> Vec<Commit> {
    let fetches = pull_requests
        .iter()
        .filter_map(|pr| {
            pr.merge_commit_sha
                .as_deref()
                .filter(|sha| !sha.is_empty())
                .map(|sha| (pr.number, sha))
        })
        .map(|(number, sha)| async move {
            match github.get_commit(repo, sha).await {
                Ok(commit) => Some(commit),
                Err(err) => {
                    tracing::warn!("skipping merge commit of #{number}: {err}");
                    None
                }
            }
        });

    join_all(fetches).await.into_iter().flatten().collect()
}
