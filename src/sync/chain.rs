//! Issue-created follow-ups
//!
//! Once GitHub confirms an issue for a new card, three writes link the two
//! sides: a back-link comment on the issue, the tracked title on the card,
//! and a forward-link comment on the card.

use crate::bus::{
    CardCommentCreate, CardEvent, CardUpdate, CreatedIssue, IssueCommentCreate, IssueTarget,
    OutboundAction,
};
use crate::config::{LinkTemplates, Project};
use crate::identity;

/// State carried from a card-created decision to its issue-create completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCreatedContinuation {
    card_id: String,
    card_title: String,
    card_url: String,
    project: Project,
}

impl IssueCreatedContinuation {
    pub fn new(card: &CardEvent, project: &Project, links: &LinkTemplates) -> Self {
        Self {
            card_id: card.id.clone(),
            card_title: card.title.clone(),
            card_url: links.card_url(&card.id),
            project: project.clone(),
        }
    }

    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    /// Project the issue was created in
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Card title after tracking: `#CODE-N summary`
    pub fn tracked_title(&self, issue: &CreatedIssue) -> String {
        identity::encode(
            self.project.code(),
            &issue.id,
            identity::strip_project_code(&self.card_title),
        )
    }

    /// The three follow-up actions, in no required order
    pub fn follow_ups(&self, issue: &CreatedIssue) -> [OutboundAction; 3] {
        [
            OutboundAction::IssueCommentCreate(IssueCommentCreate {
                owner: self.project.github.owner.clone(),
                repo: self.project.github.repo.clone(),
                card: IssueTarget {
                    id: issue.id.clone(),
                },
                body: format!("Trello: {}", self.card_url),
            }),
            OutboundAction::CardUpdate(CardUpdate {
                id: self.card_id.clone(),
                title: self.tracked_title(issue),
            }),
            OutboundAction::CardCommentCreate(CardCommentCreate {
                id: self.card_id.clone(),
                text: format!("GitHub: {}", issue.url),
            }),
        ]
    }
}
