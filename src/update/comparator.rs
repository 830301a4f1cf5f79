//! Latest-version resolution over published versions

use super::range::VersionRange;
use semver::Version;
use std::cmp::Ordering;

/// Returns true if `version` carries a prerelease identifier
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

/// Parse published version strings, ignoring the ones that are not valid semver
pub fn parse_versions<'a>(versions: impl IntoIterator<Item = &'a str>) -> Vec<Version> {
    versions
        .into_iter()
        .filter_map(|v| Version::parse(v.trim().trim_start_matches('v')).ok())
        .collect()
}

/// Order by semver precedence, build metadata ignored
///
/// Versions of equal precedence prefer the one without build metadata.
fn by_precedence(a: &&Version, b: &&Version) -> Ordering {
    a.cmp_precedence(b)
        .then_with(|| a.build.is_empty().cmp(&b.build.is_empty()))
}

/// Latest version satisfying `range`
///
/// Prereleases are only considered when `include_unstable` is set; they then
/// take part in range matching by plain semver precedence. Returns `None` when
/// no version qualifies.
pub fn resolve_latest<'a>(
    range: &VersionRange,
    available: &'a [Version],
    include_unstable: bool,
) -> Option<&'a Version> {
    available
        .iter()
        .filter(|v| include_unstable || !is_prerelease(v))
        .filter(|v| range.satisfies(v))
        .max_by(by_precedence)
}

/// Latest published version overall, with the same stability filter
pub fn newest(available: &[Version], include_unstable: bool) -> Option<&Version> {
    available
        .iter()
        .filter(|v| include_unstable || !is_prerelease(v))
        .max_by(by_precedence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(list: &[&str]) -> Vec<Version> {
        parse_versions(list.iter().copied())
    }

    fn resolve(range: &str, list: &[&str], unstable: bool) -> Option<String> {
        let range = VersionRange::parse(range).unwrap();
        let available = versions(list);
        resolve_latest(&range, &available, unstable).map(|v| v.to_string())
    }

    #[test]
    fn test_caret_range_excludes_next_major() {
        let list = ["1.2.0", "1.3.0", "2.0.0-beta.1", "2.0.0"];
        assert_eq!(resolve("^1.2.0", &list, false).as_deref(), Some("1.3.0"));
        assert_eq!(resolve("^1.2.0", &list, true).as_deref(), Some("1.3.0"));
    }

    #[test]
    fn test_star_range_stability() {
        let list = ["1.0.0", "2.0.0-rc.1"];
        assert_eq!(resolve("*", &list, false).as_deref(), Some("1.0.0"));
        assert_eq!(resolve("*", &list, true).as_deref(), Some("2.0.0-rc.1"));
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(resolve("^3.0.0", &["1.0.0", "2.0.0"], false), None);
        assert_eq!(resolve("^1.0.0", &[], true), None);
    }

    #[test]
    fn test_only_prereleases_in_range() {
        let list = ["1.0.0", "2.0.0-alpha.1", "2.0.0-alpha.2"];
        assert_eq!(resolve(">=2.0.0-alpha.1", &list, false), None);
        assert_eq!(
            resolve(">=2.0.0-alpha.1", &list, true).as_deref(),
            Some("2.0.0-alpha.2")
        );
    }

    #[test]
    fn test_numeric_precedence() {
        let list = ["1.9.0", "1.10.0", "1.2.0"];
        assert_eq!(resolve("^1.0.0", &list, false).as_deref(), Some("1.10.0"));
    }

    #[test]
    fn test_prerelease_identifier_precedence() {
        let list = ["1.0.0-alpha", "1.0.0-alpha.1", "1.0.0-beta.2", "1.0.0-beta.11"];
        assert_eq!(resolve("*", &list, true).as_deref(), Some("1.0.0-beta.11"));
    }

    #[test]
    fn test_release_outranks_prerelease() {
        let list = ["1.0.0-rc.1", "1.0.0"];
        assert_eq!(resolve("*", &list, true).as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_stable_never_prerelease() {
        let ranges = ["*", "^1.0.0", ">=0.0.0", "1.x || 2.x", "<3.0.0"];
        let list = ["0.9.0", "1.0.0-rc.1", "1.1.0", "2.0.0-beta.3", "2.5.0-next.0"];
        let available = versions(&list);
        for raw in ranges {
            let range = VersionRange::parse(raw).unwrap();
            if let Some(found) = resolve_latest(&range, &available, false) {
                assert!(!is_prerelease(found), "{} gave {}", raw, found);
            }
        }
    }

    #[test]
    fn test_result_satisfies_range() {
        let ranges = ["~1.1.0", "^0.9.0", ">1.0.0 <2.0.0", "1.0.0 - 1.1.0", "2.x"];
        let list = ["0.9.0", "0.9.4", "1.0.0", "1.1.0", "1.1.3", "2.0.0-beta.3", "2.1.0"];
        let available = versions(&list);
        for raw in ranges {
            let range = VersionRange::parse(raw).unwrap();
            for unstable in [false, true] {
                if let Some(found) = resolve_latest(&range, &available, unstable) {
                    assert!(range.satisfies(found), "{} gave {}", raw, found);
                }
            }
        }
    }

    #[test]
    fn test_monotonic_when_adding_higher_version() {
        let range = VersionRange::parse("^1.0.0").unwrap();
        let mut available = versions(&["1.0.0", "1.1.0"]);
        let before = resolve_latest(&range, &available, false).cloned();

        available.push(Version::parse("1.4.0").unwrap());
        let after = resolve_latest(&range, &available, false).cloned();

        assert!(after >= before);
        assert_eq!(after.unwrap().to_string(), "1.4.0");
    }

    #[test]
    fn test_newest() {
        let available = versions(&["1.0.0", "3.0.0-rc.1", "2.0.0"]);
        assert_eq!(newest(&available, false).unwrap().to_string(), "2.0.0");
        assert_eq!(newest(&available, true).unwrap().to_string(), "3.0.0-rc.1");
        assert!(newest(&[], false).is_none());
    }

    #[test]
    fn test_build_metadata_does_not_outrank_release() {
        let available = versions(&["1.0.0+build.5", "1.0.0", "0.9.0+build.9"]);
        assert_eq!(newest(&available, false).unwrap().to_string(), "1.0.0");
        assert_eq!(
            resolve("1.0.0", &["1.0.0", "1.0.0+build.5"], false).as_deref(),
            Some("1.0.0")
        );
        assert_eq!(
            resolve("^1.0.0", &["1.0.0+build.5"], false).as_deref(),
            Some("1.0.0+build.5")
        );
    }

    #[test]
    fn test_build_metadata_loses_to_higher_precedence() {
        let available = versions(&["1.0.0", "1.0.1+build.1"]);
        assert_eq!(newest(&available, false).unwrap().to_string(), "1.0.1+build.1");
    }

    #[test]
    fn test_parse_versions_skips_invalid() {
        let parsed = parse_versions(["1.0.0", "not-a-version", "v2.0.0", "1.0"]);
        let strings: Vec<String> = parsed.iter().map(|v| v.to_string()).collect();
        assert_eq!(strings, vec!["1.0.0", "2.0.0"]);
    }
}
