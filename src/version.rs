//! Version normalization and release matching helpers.
//!
//! Matching is purely string-based after prefix stripping; `1.0` and `1.0.0`
//! are distinct versions here. Semantic-version comparison is deliberately
//! out of scope.

use chrono::{DateTime, Utc};

use crate::github::Release;

/// Strips decoration from a version string: surrounding whitespace, a
/// `refs/tags/` prefix, and a single leading `v` or `V`.
pub fn normalize_version(version: &str) -> &str {
    let v = version.trim();
    let v = v.strip_prefix("refs/tags/").unwrap_or(v);
    v.strip_prefix(['v', 'V']).unwrap_or(v)
}

/// True iff both strings are non-empty and normalize to the same version.
/// Case-sensitive beyond the single leading-letter strip.
pub fn versions_match(affected: &str, tag: &str) -> bool {
    if affected.is_empty() || tag.is_empty() {
        return false;
    }
    normalize_version(affected) == normalize_version(tag)
}

/// Best-effort timestamp of a release: publish time, falling back to
/// creation time.
pub fn release_time(release: &Release) -> Option<DateTime<Utc>> {
    release.published_at.or(release.created_at)
}

/// Returns a copy of the releases stably sorted by [`release_time`] in
/// ascending order. Releases without any timestamp sort first.
pub fn sort_releases_by_time(releases: &[Release]) -> Vec<Release> {
    let mut sorted = releases.to_vec();
    sorted.sort_by_key(release_time);
    sorted
}

/// Finds the first release whose tag or display name matches the version.
pub fn find_release_by_version<'a>(releases: &'a [Release], version: &str) -> Option<&'a Release> {
    if version.is_empty() {
        return None;
    }
    releases.iter().find(|release| {
        versions_match(version, &release.tag_name)
            || versions_match(version, release.name.as_deref().unwrap_or(""))
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn release(tag: &str, published: Option<&str>) -> Release {
        Release {
            tag_name: tag.to_string(),
            published_at: published.map(|p| p.parse().unwrap()),
            ..Release::default()
        }
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("v1.2.3"), "1.2.3");
        assert_eq!(normalize_version("1.2.3"), "1.2.3");
        assert_eq!(normalize_version("refs/tags/v2.0.0"), "2.0.0");
        assert_eq!(normalize_version("  V3.1.4  "), "3.1.4");
        // Only one leading letter is stripped.
        assert_eq!(normalize_version("vv1.0.0"), "v1.0.0");
    }

    #[test]
    fn test_versions_match() {
        assert!(versions_match("1.1.0", "v1.1.0"));
        assert!(versions_match("refs/tags/v2.0.0", "2.0.0"));
        assert!(!versions_match("", "v1.0.0"));
        assert!(!versions_match("1.0.0", ""));
        // No semver semantics: these are different strings.
        assert!(!versions_match("1.0", "1.0.0"));
        assert!(!versions_match("1.0.0-RC1", "1.0.0-rc1"));
    }

    #[test]
    fn test_release_time_falls_back_to_created_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let r = Release {
            tag_name: "v1.0.0".to_string(),
            created_at: Some(created),
            ..Release::default()
        };
        assert_eq!(release_time(&r), Some(created));
        assert_eq!(release_time(&Release::default()), None);
    }

    #[test]
    fn test_sort_releases_by_time() {
        let releases = vec![
            release("v2.0.0", Some("2024-06-01T00:00:00Z")),
            release("v1.0.0", Some("2023-01-01T00:00:00Z")),
            release("v1.5.0", Some("2023-09-01T00:00:00Z")),
        ];
        let sorted = sort_releases_by_time(&releases);
        let tags: Vec<&str> = sorted.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, ["v1.0.0", "v1.5.0", "v2.0.0"]);
    }

    #[test]
    fn test_find_release_by_version_matches_tag_or_name() {
        let mut by_name = release("build-42", None);
        by_name.name = Some("v3.0.0".to_string());
        let releases = vec![release("v1.0.0", None), by_name];

        assert_eq!(
            find_release_by_version(&releases, "1.0.0").unwrap().tag_name,
            "v1.0.0"
        );
        assert_eq!(
            find_release_by_version(&releases, "3.0.0").unwrap().tag_name,
            "build-42"
        );
        assert!(find_release_by_version(&releases, "9.9.9").is_none());
        assert!(find_release_by_version(&releases, "").is_none());
    }
}
