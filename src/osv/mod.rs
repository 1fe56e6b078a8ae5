//! OSV vulnerability record model and field extraction.
//!
//! OSV records are heterogeneous: repository identity may sit on the package
//! name (ecosystem `GIT`) or on a range's `repo` field, version lists and
//! range events may be missing at any nesting level, and the canonical CVE
//! identifier may live on the record itself or among its aliases. The
//! extractors here tolerate absence everywhere and never fail on a partial
//! record unless the caller needs the missing piece.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cve::is_valid_cve_format;
use crate::error::{Error, Result};
use crate::repository::RepoRef;

pub mod client;

pub use client::OsvClient;

/// A vulnerability record as returned by the OSV API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub affected: Vec<Affected>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Affected {
    #[serde(default)]
    pub package: Option<Package>,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub ranges: Vec<Range>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ecosystem: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Range {
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub introduced: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
}

impl Vulnerability {
    /// The record identifier, or `<unknown>` for diagnostics on records
    /// without one.
    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or("<unknown>")
    }
}

/// Pulls the first parseable repository reference out of the record.
///
/// Per affected entry the package name is tried first (only when the
/// ecosystem is absent or `GIT`), then each range's `repo` field. The first
/// successful parse wins.
pub fn extract_repository(vuln: &Vulnerability) -> Result<RepoRef> {
    vuln.affected
        .iter()
        .find_map(repository_from_affected)
        .ok_or_else(|| Error::RepositoryNotFound {
            vuln_id: vuln.id_or_unknown().to_string(),
        })
}

fn repository_from_affected(affected: &Affected) -> Option<RepoRef> {
    if let Some(repo) = affected.package.as_ref().and_then(repository_from_package) {
        return Some(repo);
    }
    affected
        .ranges
        .iter()
        .find_map(|range| RepoRef::parse(range.repo.as_deref()?).ok())
}

fn repository_from_package(package: &Package) -> Option<RepoRef> {
    if package.ecosystem.as_deref().is_some_and(|e| e != "GIT") {
        return None;
    }
    RepoRef::parse(package.name.as_deref()?).ok()
}

/// Flattens every `versions` list into a deduplicated, lexicographically
/// sorted sequence. Empty when the record carries no version data.
pub fn collect_affected_versions(vuln: &Vulnerability) -> Vec<String> {
    let mut versions = BTreeSet::new();
    for affected in &vuln.affected {
        for version in &affected.versions {
            if !version.is_empty() {
                versions.insert(version.clone());
            }
        }
    }
    versions.into_iter().collect()
}

/// The lexicographically smallest affected version, when any exists.
pub fn earliest_affected_version(vuln: &Vulnerability) -> Option<String> {
    collect_affected_versions(vuln).into_iter().next()
}

/// First non-empty `introduced` commit hash in declaration order.
pub fn extract_introduced_commit(vuln: &Vulnerability) -> Option<String> {
    fn introduced(event: &Event) -> Option<&str> {
        event.introduced.as_deref()
    }
    first_event_value(vuln, introduced)
}

/// First non-empty `fixed` commit hash in declaration order.
pub fn extract_fixed_commit(vuln: &Vulnerability) -> Option<String> {
    fn fixed(event: &Event) -> Option<&str> {
        event.fixed.as_deref()
    }
    first_event_value(vuln, fixed)
}

fn first_event_value(vuln: &Vulnerability, pick: fn(&Event) -> Option<&str>) -> Option<String> {
    vuln.affected
        .iter()
        .flat_map(|affected| &affected.ranges)
        .flat_map(|range| &range.events)
        .filter_map(|event| pick(event))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// The canonical CVE identifier of the record: its own id when CVE-shaped,
/// otherwise the first CVE-shaped alias.
pub fn extract_cve_id(vuln: &Vulnerability) -> Option<String> {
    if let Some(id) = &vuln.id {
        if is_valid_cve_format(id) {
            return Some(id.clone());
        }
    }
    vuln.aliases
        .iter()
        .find(|alias| is_valid_cve_format(alias))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_events(events: Vec<Event>) -> Vulnerability {
        Vulnerability {
            affected: vec![Affected {
                ranges: vec![Range {
                    repo: None,
                    events,
                }],
                ..Affected::default()
            }],
            ..Vulnerability::default()
        }
    }

    #[test]
    fn test_extract_repository_prefers_git_package_name() {
        let vuln = Vulnerability {
            affected: vec![Affected {
                package: Some(Package {
                    name: Some("https://github.com/octo/from-package".to_string()),
                    ecosystem: Some("GIT".to_string()),
                }),
                ranges: vec![Range {
                    repo: Some("https://github.com/octo/from-range".to_string()),
                    events: vec![],
                }],
                ..Affected::default()
            }],
            ..Vulnerability::default()
        };

        let repo = extract_repository(&vuln).unwrap();
        assert_eq!(repo.name, "from-package");
    }

    #[test]
    fn test_extract_repository_skips_non_git_package() {
        let vuln = Vulnerability {
            affected: vec![Affected {
                package: Some(Package {
                    name: Some("https://github.com/octo/from-package".to_string()),
                    ecosystem: Some("crates.io".to_string()),
                }),
                ranges: vec![Range {
                    repo: Some("https://github.com/octo/from-range".to_string()),
                    events: vec![],
                }],
                ..Affected::default()
            }],
            ..Vulnerability::default()
        };

        let repo = extract_repository(&vuln).unwrap();
        assert_eq!(repo.name, "from-range");
    }

    #[test]
    fn test_extract_repository_reports_vulnerability_id() {
        let vuln = Vulnerability {
            id: Some("OSV-2024-1".to_string()),
            ..Vulnerability::default()
        };
        match extract_repository(&vuln) {
            Err(Error::RepositoryNotFound { vuln_id }) => assert_eq!(vuln_id, "OSV-2024-1"),
            other => panic!("unexpected result: {other:?}"),
        }

        match extract_repository(&Vulnerability::default()) {
            Err(Error::RepositoryNotFound { vuln_id }) => assert_eq!(vuln_id, "<unknown>"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_collect_affected_versions_dedupes_and_sorts() {
        let vuln = Vulnerability {
            affected: vec![
                Affected {
                    versions: vec!["1.0.1".to_string(), "1.0.0".to_string()],
                    ..Affected::default()
                },
                Affected {
                    versions: vec!["2.0.0".to_string(), "1.0.0".to_string()],
                    ..Affected::default()
                },
            ],
            ..Vulnerability::default()
        };

        assert_eq!(
            collect_affected_versions(&vuln),
            vec!["1.0.0", "1.0.1", "2.0.0"]
        );
        assert_eq!(earliest_affected_version(&vuln).as_deref(), Some("1.0.0"));
        assert!(collect_affected_versions(&Vulnerability::default()).is_empty());
    }

    #[test]
    fn test_extract_commits_first_wins() {
        let vuln = record_with_events(vec![
            Event {
                introduced: Some("intro-001".to_string()),
                fixed: Some("fix-001".to_string()),
            },
            Event {
                introduced: Some("intro-002".to_string()),
                fixed: Some("fix-002".to_string()),
            },
        ]);

        assert_eq!(extract_introduced_commit(&vuln).as_deref(), Some("intro-001"));
        assert_eq!(extract_fixed_commit(&vuln).as_deref(), Some("fix-001"));
    }

    #[test]
    fn test_extract_commits_skip_empty_values() {
        let vuln = record_with_events(vec![
            Event {
                introduced: Some(String::new()),
                fixed: None,
            },
            Event {
                introduced: Some("intro-002".to_string()),
                fixed: None,
            },
        ]);

        assert_eq!(extract_introduced_commit(&vuln).as_deref(), Some("intro-002"));
        assert_eq!(extract_fixed_commit(&vuln), None);
    }

    #[test]
    fn test_extract_commits_absent_structure() {
        assert_eq!(extract_introduced_commit(&Vulnerability::default()), None);
        assert_eq!(extract_fixed_commit(&Vulnerability::default()), None);
    }

    #[test]
    fn test_extract_cve_id_prefers_record_id() {
        let vuln = Vulnerability {
            id: Some("CVE-2023-2727".to_string()),
            aliases: vec!["CVE-2020-0001".to_string()],
            ..Vulnerability::default()
        };
        assert_eq!(extract_cve_id(&vuln).as_deref(), Some("CVE-2023-2727"));
    }

    #[test]
    fn test_extract_cve_id_falls_back_to_aliases() {
        let vuln = Vulnerability {
            id: Some("GHSA-xxxx-yyyy-zzzz".to_string()),
            aliases: vec![
                "GHSA-aaaa-bbbb-cccc".to_string(),
                "CVE-2021-44228".to_string(),
            ],
            ..Vulnerability::default()
        };
        assert_eq!(extract_cve_id(&vuln).as_deref(), Some("CVE-2021-44228"));

        assert_eq!(extract_cve_id(&Vulnerability::default()), None);
    }
}
