//! GitHub REST API client.
//!
//! A thin wrapper over the handful of endpoints the correlation engine
//! needs. Every method takes the repository reference explicitly; the client
//! itself holds no per-repository state, so one instance can serve
//! concurrent queries against different repositories. The base URL is
//! injected at construction for the same reason as on the OSV side.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Commit, Issue, PullRequest, Release, RepoInfo};
use crate::error::{Error, Result};
use crate::repository::RepoRef;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Releases are fetched in pages of this size until a short page signals
/// exhaustion.
const RELEASES_PER_PAGE: usize = 100;

/// GitHub REST API client.
pub struct GithubClient {
    client: Arc<Client>,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(client: Arc<Client>, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetches repository metadata.
    pub async fn get_repository(&self, repo: &RepoRef) -> Result<RepoInfo> {
        let url = format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name);
        self.get_json(self.get(&url), &url).await
    }

    /// Lists all releases, paginating to exhaustion. The API returns them
    /// newest-first and that order is preserved. With `exclude_prereleases`
    /// set, releases flagged as prereleases are dropped after fetching.
    pub async fn list_releases(
        &self,
        repo: &RepoRef,
        exclude_prereleases: bool,
    ) -> Result<Vec<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.base_url, repo.owner, repo.name);

        let per_page = RELEASES_PER_PAGE.to_string();
        let mut releases = Vec::new();
        let mut page: u32 = 1;
        loop {
            let page_param = page.to_string();
            let request = self.get(&url).query(&[
                ("per_page", per_page.as_str()),
                ("page", page_param.as_str()),
            ]);
            let batch: Vec<Release> = self.get_json(request, &url).await?;
            let fetched = batch.len();
            releases.extend(batch);
            if fetched < RELEASES_PER_PAGE {
                break;
            }
            page += 1;
        }

        tracing::debug!("fetched {} releases for {repo}", releases.len());

        if exclude_prereleases {
            releases.retain(|release| !release.prerelease);
        }
        Ok(releases)
    }

    /// Lists the pull requests containing the commit, in the platform's
    /// returned order.
    pub async fn list_pull_requests_with_commit(
        &self,
        repo: &RepoRef,
        commit_hash: &str,
    ) -> Result<Vec<PullRequest>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{commit_hash}/pulls",
            self.base_url, repo.owner, repo.name
        );
        self.get_json(self.get(&url), &url).await
    }

    /// Searches pull requests merged inside the given window. Search results
    /// arrive as issues; merged PRs among them carry a `pull_request` link.
    pub async fn search_merged_pull_requests(
        &self,
        repo: &RepoRef,
        merged_after: DateTime<Utc>,
        merged_before: DateTime<Utc>,
    ) -> Result<Vec<Issue>> {
        if merged_before < merged_after {
            return Err(Error::InvalidTimeWindow);
        }

        let query = format!(
            "repo:{}/{} is:pr is:merged merged:{}..{}",
            repo.owner,
            repo.name,
            merged_after.to_rfc3339_opts(SecondsFormat::Secs, true),
            merged_before.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        tracing::debug!("searching merged pull requests: {query}");

        let url = format!("{}/search/issues", self.base_url);
        let request = self.get(&url).query(&[("q", query.as_str())]);
        let results: SearchResults = self.get_json(request, &url).await?;
        Ok(results.items)
    }

    /// Fetches one pull request by number.
    pub async fn get_pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{number}",
            self.base_url, repo.owner, repo.name
        );
        self.get_json(self.get(&url), &url).await
    }

    /// Fetches one commit by hash.
    pub async fn get_commit(&self, repo: &RepoRef, commit_hash: &str) -> Result<Commit> {
        let url = format!(
            "{}/repos/{}/{}/commits/{commit_hash}",
            self.base_url, repo.owner, repo.name
        );
        self.get_json(self.get(&url), &url).await
    }
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    items: Vec<Issue>,
}
