//! Configuration, sourced from the environment.

use std::env;

use crate::github::client::GITHUB_API_BASE;
use crate::osv::client::OSV_API_BASE;

/// Runtime configuration. Both API base URLs are injectable so tests and
/// alternate deployments can redirect the clients without touching any
/// global state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Personal access token; raises GitHub rate limits and is required for
    /// search-heavy queries. Anonymous access works for the rest.
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub osv_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: GITHUB_API_BASE.to_string(),
            osv_api_url: OSV_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Reads `GITHUB_TOKEN`, `GITHUB_API_URL`, and `OSV_API_URL` from the
    /// environment, falling back to the public endpoints.
    pub fn from_env() -> Self {
        Self {
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| GITHUB_API_BASE.to_string()),
            osv_api_url: env::var("OSV_API_URL").unwrap_or_else(|_| OSV_API_BASE.to_string()),
        }
    }
}
