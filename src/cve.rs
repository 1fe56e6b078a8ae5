//! CVE identifier validation.

use std::sync::LazyLock;

use regex::Regex;

static CVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CVE-\d{4}-\d{4,}$").expect("static regex"));

/// Checks whether a string is a well-formed CVE identifier
/// (`CVE-` followed by a 4-digit year and at least 4 sequence digits).
///
/// Matching is exact: lowercase prefixes, underscore separators, and short
/// sequence numbers are all rejected.
pub fn is_valid_cve_format(s: &str) -> bool {
    CVE_PATTERN.is_match(s)
}
