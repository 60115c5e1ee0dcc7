//! Outbound actions
//!
//! Requests we emit toward GitHub, Trello and Jenkins. Field names are the
//! contract with the client adapters behind the bus and must not change.
//! On the wire an action is `{"action": "<kind>", "payload": {...}}`.

use crate::identity::IssueNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response body returned by the bus for a completed action
pub type ActionResponse = serde_json::Value;

/// Completion of an emitted action
pub type ActionOutcome = std::result::Result<ActionResponse, ActionFailure>;

/// A failed action, as reported by the bus
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct ActionFailure {
    /// Error reported by the adapter
    pub error: String,

    /// Whatever partial response came back with the error
    pub response: Option<ActionResponse>,
}

impl ActionFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            response: None,
        }
    }

    pub fn with_response(mut self, response: ActionResponse) -> Self {
        self.response = Some(response);
        self
    }
}

/// GitHub issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Archived cards close their issue, everything else reopens it
    pub fn from_card_closed(closed: bool) -> Self {
        if closed {
            IssueState::Closed
        } else {
            IssueState::Open
        }
    }
}

/// `github.issue.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCreate {
    pub owner: String,
    pub repo: String,
    pub title: String,
}

/// `github.issue.update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    pub owner: String,
    pub repo: String,
    pub id: IssueNumber,
    pub state: IssueState,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Issue reference inside `github.issueComment.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTarget {
    pub id: IssueNumber,
}

/// `github.issueComment.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentCreate {
    pub owner: String,
    pub repo: String,
    pub card: IssueTarget,
    pub body: String,
}

/// `trello.card.update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUpdate {
    pub id: String,
    pub title: String,
}

/// `trello.cardComment.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCommentCreate {
    pub id: String,
    pub text: String,
}

/// Parameters passed to a Jenkins job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParams {
    #[serde(rename = "TAG_STRING")]
    pub tag_string: String,
}

/// `jenkins.job.build`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobBuild {
    pub job: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<JobParams>,
}

/// Outbound action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    IssueCreate,
    IssueUpdate,
    IssueCommentCreate,
    CardUpdate,
    CardCommentCreate,
    JobBuild,
}

impl ActionKind {
    /// Bus action name
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::IssueCreate => "github.issue.create",
            ActionKind::IssueUpdate => "github.issue.update",
            ActionKind::IssueCommentCreate => "github.issueComment.create",
            ActionKind::CardUpdate => "trello.card.update",
            ActionKind::CardCommentCreate => "trello.cardComment.create",
            ActionKind::JobBuild => "jenkins.job.build",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action emitted toward one of the external systems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload")]
pub enum OutboundAction {
    #[serde(rename = "github.issue.create")]
    IssueCreate(IssueCreate),

    #[serde(rename = "github.issue.update")]
    IssueUpdate(IssueUpdate),

    #[serde(rename = "github.issueComment.create")]
    IssueCommentCreate(IssueCommentCreate),

    #[serde(rename = "trello.card.update")]
    CardUpdate(CardUpdate),

    #[serde(rename = "trello.cardComment.create")]
    CardCommentCreate(CardCommentCreate),

    #[serde(rename = "jenkins.job.build")]
    JobBuild(JobBuild),
}

impl OutboundAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            OutboundAction::IssueCreate(_) => ActionKind::IssueCreate,
            OutboundAction::IssueUpdate(_) => ActionKind::IssueUpdate,
            OutboundAction::IssueCommentCreate(_) => ActionKind::IssueCommentCreate,
            OutboundAction::CardUpdate(_) => ActionKind::CardUpdate,
            OutboundAction::CardCommentCreate(_) => ActionKind::CardCommentCreate,
            OutboundAction::JobBuild(_) => ActionKind::JobBuild,
        }
    }
}

/// Fields we read from a successful `github.issue.create` response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    /// Number assigned to the new issue
    pub id: IssueNumber,

    /// Browser URL of the new issue
    pub url: String,
}

impl CreatedIssue {
    /// Read the created issue out of a create response
    pub fn from_response(response: &ActionResponse) -> Result<Self, ActionFailure> {
        serde_json::from_value(response.clone()).map_err(|e| {
            ActionFailure::new(format!("Malformed issue create response: {}", e))
                .with_response(response.clone())
        })
    }
}
