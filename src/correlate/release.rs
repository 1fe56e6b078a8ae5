//! Release correlation: mapping affected versions onto the release history.

use crate::error::{Error, Result};
use crate::github::Release;
use crate::osv::{Vulnerability, collect_affected_versions};
use crate::version::versions_match;

/// Finds the release immediately preceding the first release matching any of
/// the record's affected versions — the last release believed free of the
/// vulnerability.
///
/// PRECONDITION: `releases` must be ordered newest-first, exactly as the
/// GitHub releases API returns them. The scan does not verify this; a list
/// in any other order produces a silently wrong answer. Callers holding
/// unordered releases should sort by
/// [`sort_releases_by_time`](crate::version::sort_releases_by_time) and
/// reverse before calling.
///
/// Affected versions are tried in their sorted order; the first one that
/// matches a release with a successor in the list wins. A version matching
/// the final list element has no previous release and the scan moves on to
/// the next version.
pub fn find_previous_release<'a>(
    vuln: &Vulnerability,
    releases: &'a [Release],
) -> Result<&'a Release> {
    let (_, previous) = find_release_window(vuln, releases)?;
    Ok(previous)
}

/// Like [`find_previous_release`], but returns both ends of the window: the
/// matched (first affected) release and its predecessor in time. The window
/// is where the vulnerability is believed to have been introduced.
pub fn find_release_window<'a>(
    vuln: &Vulnerability,
    releases: &'a [Release],
) -> Result<(&'a Release, &'a Release)> {
    if releases.is_empty() {
        return Err(Error::EmptyReleaseList);
    }

    let versions = collect_affected_versions(vuln);
    if versions.is_empty() {
        return Err(Error::NoAffectedVersions {
            vuln_id: vuln.id_or_unknown().to_string(),
        });
    }

    for version in &versions {
        if let Some(window) = window_for_version(releases, version) {
            return Ok(window);
        }
    }

    Err(Error::NoMatchingRelease { versions })
}

fn window_for_version<'a>(
    releases: &'a [Release],
    target: &str,
) -> Option<(&'a Release, &'a Release)> {
    let matched = releases
        .iter()
        .position(|release| versions_match(target, &release.tag_name))?;
    let previous = releases.get(matched + 1)?;
    Some((&releases[matched], previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osv::Affected;

    fn release(tag: &str) -> Release {
        Release {
            tag_name: tag.to_string(),
            ..Release::default()
        }
    }

    fn record(versions: &[&str]) -> Vulnerability {
        Vulnerability {
            id: Some("CVE-2024-0001".to_string()),
            affected: vec![Affected {
                versions: versions.iter().map(|v| v.to_string()).collect(),
                ..Affected::default()
            }],
            ..Vulnerability::default()
        }
    }

    #[test]
    fn test_previous_release_is_next_list_element() {
        // Newest-first, as the API returns them.
        let releases = vec![release("v1.1.0"), release("1.0.0")];
        let previous = find_previous_release(&record(&["1.1.0"]), &releases).unwrap();
        assert_eq!(previous.tag_name, "1.0.0");
    }

    #[test]
    fn test_no_release_matches_any_version() {
        let releases = vec![release("v1.1.0")];
        match find_previous_release(&record(&["1.2.0"]), &releases) {
            Err(Error::NoMatchingRelease { versions }) => assert_eq!(versions, ["1.2.0"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_match_on_final_element_moves_to_next_version() {
        // "1.0.0" matches the tail and has no predecessor; "1.1.0" should
        // still be tried and win.
        let releases = vec![release("v2.0.0"), release("v1.1.0"), release("v1.0.0")];
        let previous = find_previous_release(&record(&["1.0.0", "1.1.0"]), &releases).unwrap();
        assert_eq!(previous.tag_name, "v1.0.0");
    }

    #[test]
    fn test_empty_release_list() {
        assert!(matches!(
            find_previous_release(&record(&["1.0.0"]), &[]),
            Err(Error::EmptyReleaseList)
        ));
    }

    #[test]
    fn test_record_without_versions() {
        let releases = vec![release("v1.0.0")];
        match find_previous_release(&record(&[]), &releases) {
            Err(Error::NoAffectedVersions { vuln_id }) => assert_eq!(vuln_id, "CVE-2024-0001"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_window_returns_matched_and_previous() {
        let releases = vec![release("v1.2.0"), release("v1.1.0"), release("v1.0.0")];
        let (matched, previous) = find_release_window(&record(&["1.1.0"]), &releases).unwrap();
        assert_eq!(matched.tag_name, "v1.1.0");
        assert_eq!(previous.tag_name, "v1.0.0");
    }
}
