//! Repository identity parsing.
//!
//! Vulnerability records reference repositories in several shapes: HTTPS
//! URLs (with or without a `.git` suffix), bare `owner/name` pairs, and
//! SSH-style `git@host:owner/name` references. All of them normalize to the
//! same `(owner, name)` pair.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// A canonical `(owner, name)` reference to a hosted repository.
///
/// Both fields are non-empty and free of path separators; a trailing `.git`
/// on the name is stripped at parse time. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parses a repository reference in any supported shape.
    ///
    /// The reference is reduced to a path: an SSH-style `git@host:` prefix
    /// is dropped, a full URL contributes its path component, anything else
    /// is treated as a path directly. The last two non-empty segments become
    /// owner and name, so extra leading segments are tolerated.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || Error::InvalidRepositoryReference(reference.to_string());

        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let path = if let Some(rest) = trimmed.strip_prefix("git@") {
            rest.split_once(':').map_or(rest, |(_, p)| p).to_string()
        } else if trimmed.contains("://") {
            let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
            parsed.path().to_string()
        } else {
            trimmed.to_string()
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Err(invalid());
        }

        let owner = segments[segments.len() - 2].to_string();
        let name = segments[segments.len() - 1];
        let name = name.strip_suffix(".git").unwrap_or(name).to_string();
        if owner.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        Ok(Self { owner, name })
    }

    /// Formats the canonical Git URL, the form under which the OSV database
    /// indexes `GIT`-ecosystem packages.
    pub fn canonical_git_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
