//! Card title codec
//!
//! The only place that knows the card title grammar. A tracked card carries
//! its correlation key as a leading marker:
//!
//! - `#42 Fix login bug` - bare issue number
//! - `#SHOP-42 Fix login bug` - project code and issue number
//!
//! An untracked card may carry a bare project code (`#SHOP Fix login bug`)
//! that routes it to a project before it has an issue.
//!
//! Every pattern is anchored at the start of the title. Markers later in
//! the title are ordinary text.

use super::ids::IssueNumber;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;

lazy_static! {
    static ref NUMERIC_MARKER: Regex =
        Regex::new(r"^#([0-9]+)").expect("numeric marker pattern is valid");
    static ref PROJECT_ISSUE_MARKER: Regex =
        Regex::new(r"^#([A-Z]+)-([0-9]+)").expect("project issue marker pattern is valid");
    static ref PROJECT_MARKER: Regex =
        Regex::new(r"^#([A-Z]+)").expect("project marker pattern is valid");
}

/// Grammars a tracked title can follow, tried in `ORDERED` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleGrammar {
    /// `#<number>`
    NumericLeading,
    /// `#<CODE>-<number>`
    ProjectCoded,
}

impl TitleGrammar {
    pub const ORDERED: [TitleGrammar; 2] = [TitleGrammar::NumericLeading, TitleGrammar::ProjectCoded];

    fn pattern(self) -> &'static Regex {
        match self {
            TitleGrammar::NumericLeading => &*NUMERIC_MARKER,
            TitleGrammar::ProjectCoded => &*PROJECT_ISSUE_MARKER,
        }
    }

    fn key(self, captures: &Captures<'_>) -> CorrelationKey {
        match self {
            TitleGrammar::NumericLeading => CorrelationKey {
                project_code: None,
                issue_number: IssueNumber::new(&captures[1]),
            },
            TitleGrammar::ProjectCoded => CorrelationKey {
                project_code: Some(captures[1].to_string()),
                issue_number: IssueNumber::new(&captures[2]),
            },
        }
    }
}

/// Cross-system correlation key carried in a card title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationKey {
    project_code: Option<String>,
    issue_number: IssueNumber,
}

impl CorrelationKey {
    /// Key in the project-coded form (`#SHOP-42`)
    pub fn new(project_code: impl Into<String>, issue_number: impl Into<IssueNumber>) -> Self {
        Self {
            project_code: Some(project_code.into()),
            issue_number: issue_number.into(),
        }
    }

    /// Key in the bare numeric form (`#42`)
    pub fn numeric(issue_number: impl Into<IssueNumber>) -> Self {
        Self {
            project_code: None,
            issue_number: issue_number.into(),
        }
    }

    pub fn project_code(&self) -> Option<&str> {
        self.project_code.as_deref()
    }

    pub fn issue_number(&self) -> &IssueNumber {
        &self.issue_number
    }

    pub fn grammar(&self) -> TitleGrammar {
        match self.project_code {
            Some(_) => TitleGrammar::ProjectCoded,
            None => TitleGrammar::NumericLeading,
        }
    }

    /// Full card title: marker followed by the summary
    pub fn title(&self, summary: &str) -> String {
        let summary = summary.trim();
        if summary.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, summary)
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.project_code {
            Some(ref code) => write!(f, "#{}-{}", code, self.issue_number),
            None => write!(f, "#{}", self.issue_number),
        }
    }
}

/// First grammar matching the start of the title, with its captures
fn leading_marker(title: &str) -> Option<(TitleGrammar, Captures<'_>)> {
    TitleGrammar::ORDERED
        .iter()
        .find_map(|grammar| grammar.pattern().captures(title).map(|c| (*grammar, c)))
}

/// Decode the correlation key from a card title
///
/// Returns `None` for untracked titles. That is the normal state of a new
/// card, not an error.
pub fn decode(title: &str) -> Option<CorrelationKey> {
    leading_marker(title).map(|(grammar, captures)| grammar.key(&captures))
}

/// Issue number carried by a card title, if any
pub fn issue_number(title: &str) -> Option<IssueNumber> {
    decode(title).map(|key| key.issue_number)
}

/// Whether the card title already carries an issue
pub fn is_tracked(title: &str) -> bool {
    leading_marker(title).is_some()
}

/// Remove leading correlation markers and trim the remainder
///
/// Each grammar is tried once, in `ORDERED` order, against whatever the
/// previous one left: `#42 #SHOP-7 Fix` becomes `Fix`. Titles without a
/// marker are returned unchanged.
pub fn strip(title: &str) -> &str {
    TitleGrammar::ORDERED
        .iter()
        .fold(title, |rest, grammar| match grammar.pattern().find(rest) {
            Some(marker) => rest[marker.end()..].trim(),
            None => rest,
        })
}

/// Remove a leading bare project code marker (`#SHOP`) and trim the remainder
///
/// Titles without the marker are returned unchanged.
pub fn strip_project_code(title: &str) -> &str {
    match PROJECT_MARKER.find(title) {
        Some(m) => title[m.end()..].trim(),
        None => title,
    }
}

/// Project code at the start of the title (`SHOP` for `#SHOP ...` or `#SHOP-42 ...`)
pub fn leading_project_code(title: &str) -> Option<&str> {
    PROJECT_MARKER
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Canonical tracked title: `#<CODE>-<number> <summary>`
pub fn encode(project_code: &str, issue_number: &IssueNumber, summary: &str) -> String {
    CorrelationKey::new(project_code, issue_number.clone()).title(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_MARKER_TITLES: &[&str] = &[
        "#42 Fix login bug",
        "#42",
        "#007   padded",
        "#SHOP-42 Fix login bug",
        "#SHOP-1",
        "#AB-9999 multi word summary #12",
    ];

    #[test]
    fn test_decode_numeric_leading() {
        let key = decode("#42 Fix login bug").unwrap();
        assert_eq!(key.issue_number().as_str(), "42");
        assert_eq!(key.project_code(), None);
        assert_eq!(key.grammar(), TitleGrammar::NumericLeading);
    }

    #[test]
    fn test_decode_returns_numeric_string_unchanged() {
        for (title, expected) in [("#007 x", "007"), ("#0", "0"), ("#123abc", "123")] {
            assert_eq!(issue_number(title).unwrap().as_str(), expected, "{}", title);
        }
    }

    #[test]
    fn test_decode_project_coded() {
        let key = decode("#SHOP-42 Fix login bug").unwrap();
        assert_eq!(key.issue_number().as_str(), "42");
        assert_eq!(key.project_code(), Some("SHOP"));
        assert_eq!(key.grammar(), TitleGrammar::ProjectCoded);
    }

    #[test]
    fn test_decode_untracked() {
        for title in [
            "Fix login bug",
            "#SHOP Fix login bug",
            "#shop-42 lowercase code",
            " #42 leading space",
            "Fix #42 later in title",
            "#SHOP- missing number",
            "",
            "#",
        ] {
            assert!(decode(title).is_none(), "{:?} should be untracked", title);
            assert!(!is_tracked(title));
        }
    }

    #[test]
    fn test_decode_is_anchored_to_first_line() {
        assert!(decode("Fix login bug\n#42").is_none());
        assert!(decode("Fix login bug\n#SHOP-42").is_none());
    }

    #[test]
    fn test_strip_removes_only_the_marker() {
        assert_eq!(strip("#42 Fix login bug"), "Fix login bug");
        assert_eq!(strip("#SHOP-42   Fix login bug  "), "Fix login bug");
        assert_eq!(strip("#SHOP-42"), "");
    }

    #[test]
    fn test_strip_numeric_then_project_marker() {
        assert_eq!(strip("#42 #SHOP-7 Fix login bug"), "Fix login bug");
        assert_eq!(strip("#42#SHOP-7"), "");
        // Grammars run in order, so a numeric marker after a coded one stays
        assert_eq!(strip("#SHOP-7 #42 Fix login bug"), "#42 Fix login bug");
    }

    #[test]
    fn test_strip_leaves_untracked_titles_alone() {
        assert_eq!(strip("  Fix login bug "), "  Fix login bug ");
        assert_eq!(strip("#SHOP Fix login bug"), "#SHOP Fix login bug");
    }

    #[test]
    fn test_stripped_single_marker_titles_decode_to_nothing() {
        for title in SINGLE_MARKER_TITLES {
            assert!(decode(strip(title)).is_none(), "{:?}", title);
        }
    }

    #[test]
    fn test_strip_project_code() {
        assert_eq!(strip_project_code("#SHOP Fix login bug"), "Fix login bug");
        assert_eq!(strip_project_code("#SHOP:Fix"), ":Fix");
        assert_eq!(strip_project_code("Fix login bug"), "Fix login bug");
        assert_eq!(strip_project_code("#42 numeric"), "#42 numeric");
    }

    #[test]
    fn test_leading_project_code() {
        assert_eq!(leading_project_code("#SHOP Fix"), Some("SHOP"));
        assert_eq!(leading_project_code("#SHOP-42 Fix"), Some("SHOP"));
        assert_eq!(leading_project_code("#42 Fix"), None);
        assert_eq!(leading_project_code("Fix #SHOP"), None);
    }

    #[test]
    fn test_encode() {
        let number = IssueNumber::from(42);
        assert_eq!(encode("SHOP", &number, "Fix login bug"), "#SHOP-42 Fix login bug");
        assert_eq!(encode("SHOP", &number, "  "), "#SHOP-42");
        assert_eq!(CorrelationKey::numeric(7u64).title("x"), "#7 x");
    }

    #[test]
    fn test_encoded_titles_round_trip() {
        for (code, number, summary) in [
            ("SHOP", "42", "Fix login bug"),
            ("A", "1", "#BLOG-3 looks like a marker"),
            ("QA", "000123", ""),
        ] {
            let number = IssueNumber::new(number);
            let title = encode(code, &number, summary);
            let key = decode(&title).unwrap();

            assert_eq!(key, CorrelationKey::new(code, number.clone()));
            assert_eq!(strip(&title), summary.trim());
            assert_eq!(encode(code, &number, strip(&title)), title);
        }
    }
}
