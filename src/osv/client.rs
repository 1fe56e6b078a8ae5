//! OSV.dev API client.
//!
//! OSV indexes `GIT`-ecosystem packages by canonical repository URL, which
//! is how a GitHub repository maps onto a vulnerability query. The base URL
//! is injected at construction so tests (and alternate deployments) can
//! point the client elsewhere.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::Vulnerability;
use crate::cve::is_valid_cve_format;
use crate::error::{Error, Result};
use crate::repository::RepoRef;

pub const OSV_API_BASE: &str = "https://api.osv.dev/v1";

/// OSV.dev API client.
pub struct OsvClient {
    client: Arc<Client>,
    base_url: String,
}

impl OsvClient {
    pub fn new(client: Arc<Client>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Queries all vulnerability records affecting the repository, using its
    /// canonical Git URL as the package name. An empty result set is not an
    /// error.
    pub async fn query_affected(&self, repo: &RepoRef) -> Result<Vec<Vulnerability>> {
        let request = QueryRequest {
            package: QueryPackage {
                name: repo.canonical_git_url(),
                ecosystem: "GIT",
            },
        };

        let url = format!("{}/query", self.base_url);
        tracing::debug!("querying OSV for {repo}");
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus {
                status: response.status(),
                url,
            });
        }

        let body: QueryResponse = response.json().await?;
        let vulns = body.vulns.unwrap_or_default();
        tracing::debug!("OSV returned {} records for {repo}", vulns.len());
        Ok(vulns)
    }

    /// Fetches a single record by CVE identifier. The identifier is
    /// validated locally first; no network call is made for a malformed one.
    pub async fn get_by_id(&self, cve_id: &str) -> Result<Vulnerability> {
        if !is_valid_cve_format(cve_id) {
            return Err(Error::InvalidCveFormat(cve_id.to_string()));
        }

        let url = format!("{}/vulns/{cve_id}", self.base_url);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::VulnerabilityNotFound(cve_id.to_string())),
            status if !status.is_success() => Err(Error::UnexpectedStatus { status, url }),
            _ => Ok(response.json().await?),
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    package: QueryPackage,
}

#[derive(Debug, Serialize)]
struct QueryPackage {
    name: String,
    ecosystem: &'static str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    vulns: Option<Vec<Vulnerability>>,
}
