//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use std::collections::HashSet;
use std::fmt;

/// Configuration token matching requests whose resolved attribute is
/// missing or unassigned.
pub const UNKNOWN_TOKEN: &str = "UNK";

/// A single resolved attribute of a geolocation record.
///
/// Lookup results frequently lack attributes: a country with no
/// subdivision data, a metro code of zero, an address outside any
/// announced autonomous system. All of those normalize to `Unknown`,
/// which policies can target explicitly with the `UNK` token without
/// colliding with a literal `"0"` or empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Attribute missing or unassigned (empty string, zero code).
    Unknown,
    /// A concrete value, compared against tokens by exact string equality.
    Known(String),
}

impl AttrValue {
    /// Normalize a textual attribute. Empty and `"0"` mean unassigned.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() || s == "0" {
            Self::Unknown
        } else {
            Self::Known(s.to_string())
        }
    }

    /// Normalize a numeric attribute (metro code, ASN). Zero means unassigned.
    pub fn from_code(code: u32) -> Self {
        if code == 0 {
            Self::Unknown
        } else {
            Self::Known(code.to_string())
        }
    }

    /// Membership against a set of configured tokens.
    ///
    /// `Unknown` matches the `UNK` token; known values match themselves.
    pub fn in_set(&self, set: &HashSet<String>) -> bool {
        match self {
            Self::Unknown => set.contains(UNKNOWN_TOKEN),
            Self::Known(v) => set.contains(v.as_str()),
        }
    }

    /// Normalized textual form, as it would appear in configuration.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => UNKNOWN_TOKEN,
            Self::Known(v) => v,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_from_text_known() {
        assert_eq!(AttrValue::from_text("US"), AttrValue::Known("US".to_string()));
        assert_eq!(
            AttrValue::from_text("US-CA"),
            AttrValue::Known("US-CA".to_string())
        );
    }

    #[test]
    fn test_from_text_empty_is_unknown() {
        assert_eq!(AttrValue::from_text(""), AttrValue::Unknown);
    }

    #[test]
    fn test_from_text_zero_is_unknown() {
        assert_eq!(AttrValue::from_text("0"), AttrValue::Unknown);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(AttrValue::from_code(0), AttrValue::Unknown);
        assert_eq!(AttrValue::from_code(807), AttrValue::Known("807".to_string()));
        assert_eq!(AttrValue::from_code(64512), AttrValue::Known("64512".to_string()));
    }

    #[test]
    fn test_in_set_known_value() {
        let s = set(&["US", "CA"]);
        assert!(AttrValue::from_text("US").in_set(&s));
        assert!(!AttrValue::from_text("DE").in_set(&s));
    }

    #[test]
    fn test_in_set_unknown_matches_token() {
        let s = set(&["UNK"]);
        assert!(AttrValue::Unknown.in_set(&s));
        assert!(AttrValue::from_text("").in_set(&s));
        assert!(AttrValue::from_text("0").in_set(&s));
        assert!(!AttrValue::from_text("US").in_set(&s));
    }

    #[test]
    fn test_in_set_unknown_without_token() {
        let s = set(&["US", "CA"]);
        assert!(!AttrValue::Unknown.in_set(&s));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AttrValue::Unknown), "UNK");
        assert_eq!(format!("{}", AttrValue::from_text("BR")), "BR");
    }
}
