//! Type-safe issue number wrapper

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Type-safe wrapper for GitHub issue numbers
///
/// Kept as the digit string read from a card title ("42", or "007" exactly
/// as typed) so the value we send back is the value the user wrote.
/// Always serialized as a JSON string; deserializes from either a string or
/// a number, since the hosting service answers creates with numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueNumber(String);

impl IssueNumber {
    /// Create a new IssueNumber from a string
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if the number fits in a u64
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueNumber {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for IssueNumber {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for IssueNumber {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for IssueNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIssueNumber {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for IssueNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawIssueNumber::deserialize(deserializer)? {
            RawIssueNumber::Number(n) => Self::from(n),
            RawIssueNumber::Text(s) => Self(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_number_keeps_digits_as_typed() {
        let number = IssueNumber::new("007");
        assert_eq!(number.as_str(), "007");
        assert_eq!(number.as_u64(), Some(7));
        assert_eq!(format!("{}", number), "007");
    }

    #[test]
    fn test_deserialize_from_number_or_string() {
        let from_number: IssueNumber = serde_json::from_str("42").unwrap();
        let from_string: IssueNumber = serde_json::from_str("\"42\"").unwrap();

        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"42\"");
    }
}
