//! Public facade over the correlation engine.
//!
//! One [`VulnService`] instance holds the two upstream clients and answers
//! the supported queries. It keeps no per-query state, so a single instance
//! can serve concurrent queries.

use std::sync::Arc;

use crate::config::Config;
use crate::correlate::{self, Predicted, Suspected};
use crate::error::Result;
use crate::github::GithubClient;
use crate::http_client::create_shared_client;
use crate::osv::{self, OsvClient, Vulnerability};
use crate::repository::RepoRef;

pub struct VulnService {
    osv: OsvClient,
    github: GithubClient,
}

impl VulnService {
    /// Builds a service from configuration, sharing one HTTP client between
    /// both upstreams.
    pub fn new(config: &Config) -> Result<Self> {
        let client = create_shared_client()?;
        Ok(Self::with_clients(
            OsvClient::new(Arc::clone(&client), config.osv_api_url.clone()),
            GithubClient::new(
                client,
                config.github_api_url.clone(),
                config.github_token.clone(),
            ),
        ))
    }

    pub fn with_clients(osv: OsvClient, github: GithubClient) -> Self {
        Self { osv, github }
    }

    /// Lists the CVE identifiers of every vulnerability affecting the
    /// repository, in the upstream response order. Records without an
    /// extractable CVE identifier are skipped.
    pub async fn list_cve_ids_by_github_url(&self, repo_url: &str) -> Result<Vec<String>> {
        let repo = RepoRef::parse(repo_url)?;
        let vulns = self.osv.query_affected(&repo).await?;
        Ok(vulns.iter().filter_map(osv::extract_cve_id).collect())
    }

    /// Lists the full vulnerability records affecting the repository,
    /// filtered to those carrying a CVE identifier.
    pub async fn list_vulnerabilities_by_github_url(
        &self,
        repo_url: &str,
    ) -> Result<Vec<Vulnerability>> {
        let repo = RepoRef::parse(repo_url)?;
        let vulns = self.osv.query_affected(&repo).await?;
        Ok(vulns
            .into_iter()
            .filter(|vuln| osv::extract_cve_id(vuln).is_some())
            .collect())
    }

    /// Predicts the introducing and fixing commits/pull requests for a CVE
    /// in the given repository.
    pub async fn build_prediction(&self, repo_url: &str, cve_id: &str) -> Result<Predicted> {
        let repo = RepoRef::parse(repo_url)?;
        let vuln = self.osv.get_by_id(cve_id).await?;
        Ok(correlate::build_prediction(&self.github, &repo, &vuln).await)
    }

    /// Like [`build_prediction`](Self::build_prediction), with the
    /// repository taken from the vulnerability record itself.
    pub async fn build_prediction_for_cve(&self, cve_id: &str) -> Result<Predicted> {
        let vuln = self.osv.get_by_id(cve_id).await?;
        let repo = osv::extract_repository(&vuln)?;
        Ok(correlate::build_prediction(&self.github, &repo, &vuln).await)
    }

    /// Collects the merged pull requests suspected to fall inside the CVE's
    /// introduction window, together with their merge commits.
    pub async fn find_suspected_pull_requests(
        &self,
        repo_url: &str,
        cve_id: &str,
    ) -> Result<Suspected> {
        let repo = RepoRef::parse(repo_url)?;
        let vuln = self.osv.get_by_id(cve_id).await?;
        correlate::find_suspected_pull_requests(&self.github, &repo, &vuln).await
    }

    /// Like [`find_suspected_pull_requests`](Self::find_suspected_pull_requests),
    /// with the repository taken from the vulnerability record itself.
    pub async fn find_suspected_pull_requests_for_cve(&self, cve_id: &str) -> Result<Suspected> {
        let vuln = self.osv.get_by_id(cve_id).await?;
        let repo = osv::extract_repository(&vuln)?;
        correlate::find_suspected_pull_requests(&self.github, &repo, &vuln).await
    }
}
