// src/release/mod.rs

// --- Imports ---
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::InvalidVersion;

// --- Regex Patterns (Lazy Static) ---
// Strict release-label shape. Anything else on a ticket is an ordinary label
// and never participates in deduplication.
static RELEASE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v(\d+)\.(\d+)\.(\d+)$").expect("Failed to compile RELEASE_LABEL_RE")
});

/// A release label parsed into its numeric parts.
///
/// Ordering is derived field by field (major, then minor, then patch), so
/// comparisons are numeric: `v7.10.0` sorts above `v7.9.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl FromStr for ReleaseVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RELEASE_LABEL_RE
            .captures(s)
            .ok_or_else(|| InvalidVersion(s.to_string()))?;
        let part = |idx: usize| {
            caps[idx]
                .parse::<u64>()
                .map_err(|_| InvalidVersion(s.to_string()))
        };
        Ok(Self {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Filters a ticket's labels down to its candidate release versions.
/// Labels that do not match the strict pattern are ignored.
pub fn release_labels<I, S>(labels: I) -> Vec<ReleaseVersion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| label.as_ref().parse().ok())
        .collect()
}

/// Decides whether a ticket's content was already published under an earlier
/// release.
///
/// A ticket can legitimately carry several release labels (e.g. backports);
/// it counts as already released iff *any* of them is strictly lower than
/// `target`. A label equal to `target` belongs to the release currently being
/// compiled and does not exclude, and a ticket with no candidate labels at
/// all counts as not yet released.
pub fn is_already_released<I, S>(target: ReleaseVersion, labels: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    release_labels(labels)
        .into_iter()
        .any(|version| version < target)
}

/// Minor release labels (`vX.Y.0`) usable as release targets, newest first.
/// Patch-level labels are dropped and duplicates collapse.
pub fn minor_release_options<I, S>(labels: I) -> Vec<ReleaseVersion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options: Vec<ReleaseVersion> = release_labels(labels)
        .into_iter()
        .filter(|version| version.patch == 0)
        .collect();
    options.sort_unstable();
    options.dedup();
    options.reverse();
    options
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn version(s: &str) -> ReleaseVersion {
        s.parse().expect("test version should parse")
    }

    #[test]
    fn test_parse_strict_release_labels() {
        assert_eq!(
            version("v7.3.0"),
            ReleaseVersion {
                major: 7,
                minor: 3,
                patch: 0
            }
        );
        assert_eq!(
            version("v10.0.12"),
            ReleaseVersion {
                major: 10,
                minor: 0,
                patch: 12
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_release_labels() {
        for label in [
            "7.3.0",
            "v7.3",
            "v7.3.0.1",
            "v7.3.x",
            "va.b.c",
            "v7.3.0-beta.1",
            "release_note:dev_docs",
            "",
            " v7.3.0",
            "v7.3.0 ",
        ] {
            assert!(
                label.parse::<ReleaseVersion>().is_err(),
                "'{}' should not parse as a release version",
                label
            );
        }
    }

    #[test]
    fn test_ordering_is_numeric_not_lexicographic() {
        assert!(version("v7.10.0") > version("v7.9.0"));
        assert!(version("v10.0.0") > version("v9.99.99"));
        assert!(version("v7.3.10") > version("v7.3.9"));
        assert!(version("v7.3.0") == version("v7.3.0"));
    }

    #[test]
    fn test_display_round_trips() {
        for label in ["v7.3.0", "v7.10.2", "v0.0.1"] {
            assert_eq!(version(label).to_string(), label);
        }
    }

    #[test]
    fn test_release_labels_filters_mixed_label_sets() {
        let labels = [
            "release_note:dev_docs",
            "v7.2.0",
            "bug",
            "v7.4.0",
            "Team:Platform",
        ];
        let mut versions = release_labels(labels);
        versions.sort_unstable();
        assert_eq!(versions, vec![version("v7.2.0"), version("v7.4.0")]);
    }

    #[test]
    fn test_ticket_with_lower_label_is_already_released() {
        // Labeled for v7.2.0 and v7.4.0: the v7.3.0 digest must skip it,
        // since the note already shipped with v7.2.0.
        let labels = ["v7.2.0", "v7.4.0", "release_note:dev_docs"];
        assert!(is_already_released(version("v7.3.0"), labels));
    }

    #[test]
    fn test_ticket_with_only_higher_labels_is_included() {
        let labels = ["v7.4.0", "v7.5.0"];
        assert!(!is_already_released(version("v7.3.0"), labels));
    }

    #[test]
    fn test_ticket_labeled_with_target_itself_is_included() {
        assert!(!is_already_released(version("v7.3.0"), ["v7.3.0"]));
    }

    #[test]
    fn test_any_lower_label_excludes_regardless_of_higher_ones() {
        // For any a < target < b, a ticket carrying both a and b is excluded.
        let cases = [
            ("v7.2.9", "v7.3.0", "v7.4.0"),
            ("v6.99.99", "v7.0.0", "v8.0.0"),
            ("v7.3.0", "v7.3.1", "v7.10.0"),
        ];
        for (lower, target, higher) in cases {
            assert!(
                is_already_released(version(target), [lower, higher]),
                "{} should exclude a ticket labeled {{{}, {}}}",
                target,
                lower,
                higher
            );
        }
    }

    #[test]
    fn test_tickets_without_release_labels_are_included() {
        assert!(!is_already_released(version("v7.3.0"), Vec::<String>::new()));
        assert!(!is_already_released(
            version("v7.3.0"),
            ["bug", "docs", "v7.x", "7.2.0"]
        ));
    }

    #[test]
    fn test_minor_release_options_sorted_newest_first() {
        let labels = [
            "v7.9.0",
            "v7.10.0",
            "v8.0.0",
            "v7.9.2", // patch release, not offered
            "v7.10.0", // duplicate collapses
            "enhancement",
        ];
        let options = minor_release_options(labels);
        assert_eq!(
            options,
            vec![version("v8.0.0"), version("v7.10.0"), version("v7.9.0")]
        );
    }
}
