use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::ImportError;

/// Returns `true` when `identifier` has the `<category>/<name>` shape, with both
/// parts made only of lowercase ASCII letters and hyphens.
pub fn validate_identifier(identifier: &str) -> bool {
    static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = IDENTIFIER_REGEX
        .get_or_init(|| Regex::new(r"^[a-z-]+/[a-z-]+$").expect("Invalid regex"));
    re.is_match(identifier)
}

/// A validated problem identifier such as `ownership/borrow-checker`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProblemId {
    raw: String,
    separator: usize,
}

impl ProblemId {
    pub fn parse(identifier: &str) -> Result<Self, ImportError> {
        if !validate_identifier(identifier) {
            return Err(ImportError::InvalidIdentifier(identifier.to_string()));
        }

        let separator = identifier
            .find('/')
            .ok_or_else(|| ImportError::InvalidIdentifier(identifier.to_string()))?;
        Ok(Self {
            raw: identifier.to_string(),
            separator,
        })
    }

    pub fn category(&self) -> &str {
        &self.raw[..self.separator]
    }

    pub fn name(&self) -> &str {
        &self.raw[self.separator + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ProblemId {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ProblemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_hyphenated_pairs() {
        for valid in [
            "basics/hello",
            "ownership/borrow-checker",
            "a/b",
            "-/-",
            "smart-pointers/rc-cell",
        ] {
            assert!(validate_identifier(valid), "{valid} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for invalid in [
            "",
            "basics",
            "basics/",
            "/hello",
            "basics/hello/world",
            "Basics/hello",
            "basics/hello2",
            "basics/hello_world",
            "basics /hello",
            "basics/hello\n",
            "bäsics/hello",
        ] {
            assert!(!validate_identifier(invalid), "{invalid:?} should be rejected");
        }
    }

    #[test]
    fn problem_id_splits_category_and_name() {
        let id = ProblemId::parse("collections/hash-map").unwrap();
        assert_eq!(id.category(), "collections");
        assert_eq!(id.name(), "hash-map");
        assert_eq!(id.to_string(), "collections/hash-map");
    }

    #[test]
    fn problem_id_reports_invalid_identifier() {
        let err = "collections/HashMap".parse::<ProblemId>().unwrap_err();
        assert!(matches!(err, ImportError::InvalidIdentifier(raw) if raw == "collections/HashMap"));
    }
}
