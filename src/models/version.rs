use serde::{Deserialize, Serialize};
use std::fmt;

/// A three-component numeric version such as `1.21.0`.
///
/// Serialized as a JSON/YAML array (`[1, 21, 0]`), which is the form the
/// manifest document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub [u32; 3]);

impl Version {
    /// Value used whenever a display string cannot be understood.
    pub const FALLBACK: Version = Version([1, 0, 0]);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self([major, minor, patch])
    }

    /// Parse a dotted display string.
    ///
    /// Parsing never fails: wrong arity or a non-numeric component yields
    /// [`Version::FALLBACK`].
    pub fn parse(text: &str) -> Self {
        let parts: Vec<Option<u32>> = text
            .split('.')
            .map(|part| part.trim().parse::<u32>().ok())
            .collect();

        match parts.as_slice() {
            [Some(major), Some(minor), Some(patch)] => Self([*major, *minor, *patch]),
            _ => {
                tracing::debug!("Unparseable version string {:?}, using 1.0.0", text);
                Self::FALLBACK
            }
        }
    }

    /// Join the components with `.`.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch] = self.0;
        write!(f, "{}.{}.{}", major, minor, patch)
    }
}

impl From<[u32; 3]> for Version {
    fn from(parts: [u32; 3]) -> Self {
        Self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_well_formed() {
        assert_eq!(Version::parse("1.21.0"), Version::new(1, 21, 0));
        assert_eq!(Version::parse("0.0.7"), Version::new(0, 0, 7));
    }

    #[test]
    fn test_parse_wrong_arity_falls_back() {
        assert_eq!(Version::parse("1.2"), Version::FALLBACK);
        assert_eq!(Version::parse("1.2.3.4"), Version::FALLBACK);
        assert_eq!(Version::parse(""), Version::FALLBACK);
    }

    #[test]
    fn test_parse_non_numeric_falls_back() {
        assert_eq!(Version::parse("1.x.0"), Version::FALLBACK);
        assert_eq!(Version::parse("1..0"), Version::FALLBACK);
        assert_eq!(Version::parse("2.4.0-beta"), Version::FALLBACK);
    }

    #[test]
    fn test_fallback_logged_at_debug_level() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        let parsed = tracing::subscriber::with_default(subscriber, || Version::parse("one.two"));

        assert_eq!(parsed, Version::FALLBACK);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&Version::new(1, 21, 0)).unwrap();
        assert_eq!(json, "[1,21,0]");

        let back: Version = serde_json::from_str("[3,2,1]").unwrap();
        assert_eq!(back, Version::new(3, 2, 1));
    }

    proptest! {
        #[test]
        fn prop_format_parse_round_trip(a in 0u32..100_000, b in 0u32..100_000, c in 0u32..100_000) {
            let display = format!("{}.{}.{}", a, b, c);
            prop_assert_eq!(Version::parse(&display).format(), display);
        }
    }
}
