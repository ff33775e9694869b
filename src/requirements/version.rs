//! Tool version parsing and comparison.
//!
//! Version-reporting commands print very different text (`v20.1.0`,
//! `PHP 8.3.2 (cli)`, `mysql  Ver 8.0.36 for Linux`). The parser takes the
//! first `major.minor[.patch]` group it finds and ignores everything else.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// A `major.minor` version. Ordering is lexicographic on (major, minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Extract the first version number from arbitrary command output.
    ///
    /// Returns `None` when no `X.Y` group is present or a component
    /// overflows `u32`.
    pub fn parse_tolerant(output: &str) -> Option<Self> {
        let caps = RE_VERSION.captures(output)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { major, minor })
    }

    /// Whether this version is equal to or newer than `required`.
    pub fn meets(&self, required: Version) -> bool {
        *self >= required
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = String;

    /// Strict parse used for configuration values (`"8.3"`, `"18"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('v');
        let mut parts = s.split('.');
        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| format!("empty version: '{}'", s))?
            .parse::<u32>()
            .map_err(|_| format!("invalid major version in '{}'", s))?;
        let minor = match parts.next() {
            Some(p) => p
                .parse::<u32>()
                .map_err(|_| format!("invalid minor version in '{}'", s))?,
            None => 0,
        };
        if parts.next().is_some_and(|p| p.parse::<u32>().is_err()) {
            return Err(format!("invalid patch version in '{}'", s));
        }
        Ok(Self { major, minor })
    }
}

/// Check raw version output against a minimum.
///
/// Unparsable output never meets the requirement.
pub fn output_meets(output: &str, required: Version) -> bool {
    Version::parse_tolerant(output).is_some_and(|v| v.meets(required))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_node_output() {
        assert_eq!(Version::parse_tolerant("v20.1.0\n"), Some(Version::new(20, 1)));
    }

    #[test]
    fn parses_php_output() {
        let out = "PHP 8.3.2 (cli) (built: Jan 16 2024 13:46:41) (NTS)\nCopyright (c) The PHP Group";
        assert_eq!(Version::parse_tolerant(out), Some(Version::new(8, 3)));
    }

    #[test]
    fn parses_mysql_output() {
        let out = "mysql  Ver 8.0.36-0ubuntu0.22.04.1 for Linux on x86_64 ((Ubuntu))";
        assert_eq!(Version::parse_tolerant(out), Some(Version::new(8, 0)));
    }

    #[test]
    fn parses_composer_output() {
        let out = "Composer version 2.7.1 2024-02-09 15:26:28";
        assert_eq!(Version::parse_tolerant(out), Some(Version::new(2, 7)));
    }

    #[test]
    fn parses_two_component_version() {
        assert_eq!(Version::parse_tolerant("tool 3.14"), Some(Version::new(3, 14)));
    }

    #[test]
    fn unparsable_output_is_none() {
        assert_eq!(Version::parse_tolerant("command not found"), None);
        assert_eq!(Version::parse_tolerant(""), None);
        assert_eq!(Version::parse_tolerant("version 8"), None);
    }

    #[test]
    fn overflowing_component_is_none() {
        assert_eq!(Version::parse_tolerant("99999999999.1"), None);
    }

    #[test]
    fn node_16_does_not_meet_18() {
        assert!(!output_meets("v16.14.0", Version::new(18, 0)));
    }

    #[test]
    fn node_20_meets_18() {
        assert!(output_meets("v20.1.0", Version::new(18, 0)));
    }

    #[test]
    fn comparison_is_lexicographic() {
        let required = Version::new(8, 3);
        assert!(Version::new(8, 3).meets(required));
        assert!(Version::new(8, 4).meets(required));
        assert!(Version::new(9, 0).meets(required));
        assert!(!Version::new(8, 2).meets(required));
        assert!(!Version::new(7, 99).meets(required));
    }

    #[test]
    fn exhaustive_small_grid_matches_tuple_order() {
        let required = Version::new(2, 3);
        for x in 0..5u32 {
            for y in 0..5u32 {
                for z in [None, Some(0u32), Some(7)] {
                    let text = match z {
                        Some(z) => format!("{}.{}.{}", x, y, z),
                        None => format!("{}.{}", x, y),
                    };
                    assert_eq!(
                        output_meets(&text, required),
                        (x, y) >= (2, 3),
                        "version {}",
                        text
                    );
                }
            }
        }
    }

    #[test]
    fn unparsable_never_meets() {
        assert!(!output_meets("garbage", Version::new(0, 0)));
    }

    #[test]
    fn from_str_accepts_major_only() {
        assert_eq!("18".parse::<Version>(), Ok(Version::new(18, 0)));
        assert_eq!("8.3".parse::<Version>(), Ok(Version::new(8, 3)));
        assert_eq!("v20.1.4".parse::<Version>(), Ok(Version::new(20, 1)));
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("eight".parse::<Version>().is_err());
        assert!("8.x".parse::<Version>().is_err());
    }

    #[test]
    fn displays_major_minor() {
        assert_eq!(Version::new(8, 3).to_string(), "8.3");
    }
}
