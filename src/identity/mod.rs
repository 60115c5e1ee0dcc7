//! Card identity
//!
//! The correlation key linking a Trello card to a GitHub issue lives in the
//! card's title and nowhere else. This module encodes and decodes it.

pub mod codec;
mod ids;

pub use codec::{
    decode, encode, is_tracked, issue_number, leading_project_code, strip, strip_project_code,
    CorrelationKey, TitleGrammar,
};
pub use ids::IssueNumber;
