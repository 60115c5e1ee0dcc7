//! Inbound events
//!
//! Payloads delivered by the bus for the Trello and GitHub events we
//! subscribe to. On the wire an event is `{"event": "<kind>", "data": {...}}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trello member acting on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrelloUser {
    /// Login name, compared against our own username
    pub username: String,

    /// Display name
    pub name: String,

    /// Avatar hash, absent for members without an avatar
    #[serde(default, rename = "avatarHash", skip_serializing_if = "Option::is_none")]
    pub avatar_hash: Option<String>,
}

impl TrelloUser {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            avatar_hash: None,
        }
    }

    pub fn with_avatar(mut self, hash: impl Into<String>) -> Self {
        self.avatar_hash = Some(hash.into());
        self
    }
}

/// A card, as carried by card created/updated events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEvent {
    /// Trello card id
    pub id: String,

    /// Card title
    pub title: String,

    /// Card description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Whether the card is archived
    #[serde(default)]
    pub closed: bool,

    /// Member who made the change
    pub user: TrelloUser,
}

impl CardEvent {
    pub fn new(id: impl Into<String>, title: impl Into<String>, user: TrelloUser) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: None,
            closed: false,
            user,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }
}

/// Card reference carried by comment and attachment events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub id: String,
    pub title: String,
}

impl CardRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Comment added to a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCommentEvent {
    pub card: CardRef,
    pub user: TrelloUser,
    pub text: String,
}

/// Attachment added to a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAttachmentEvent {
    pub card: CardRef,
    pub user: TrelloUser,

    /// Attachment display name
    pub name: String,

    /// Attachment URL
    pub url: String,
}

/// GitHub repository identity as reported by push/release events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner: String,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }
}

/// Push to a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    pub repository: RepositoryRef,
}

/// Release published on a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    pub repository: RepositoryRef,

    /// Release tag, forwarded to the deploy job
    pub tag: String,
}

/// Inbound event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CardCreated,
    CardUpdated,
    CardCommentCreated,
    CardAttachmentCreated,
    PushCreated,
    ReleaseCreated,
}

impl EventKind {
    /// Every kind the synchronizer subscribes to
    pub const ALL: [EventKind; 6] = [
        EventKind::CardCreated,
        EventKind::CardUpdated,
        EventKind::CardCommentCreated,
        EventKind::CardAttachmentCreated,
        EventKind::PushCreated,
        EventKind::ReleaseCreated,
    ];

    /// Bus event name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::CardCreated => "trello.card.created",
            EventKind::CardUpdated => "trello.card.updated",
            EventKind::CardCommentCreated => "trello.cardComment.created",
            EventKind::CardAttachmentCreated => "trello.cardAttachment.created",
            EventKind::PushCreated => "github.push.created",
            EventKind::ReleaseCreated => "github.release.created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered by the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum InboundEvent {
    #[serde(rename = "trello.card.created")]
    CardCreated(CardEvent),

    #[serde(rename = "trello.card.updated")]
    CardUpdated(CardEvent),

    #[serde(rename = "trello.cardComment.created")]
    CardCommentCreated(CardCommentEvent),

    #[serde(rename = "trello.cardAttachment.created")]
    CardAttachmentCreated(CardAttachmentEvent),

    #[serde(rename = "github.push.created")]
    PushCreated(PushEvent),

    #[serde(rename = "github.release.created")]
    ReleaseCreated(ReleaseEvent),
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::CardCreated(_) => EventKind::CardCreated,
            InboundEvent::CardUpdated(_) => EventKind::CardUpdated,
            InboundEvent::CardCommentCreated(_) => EventKind::CardCommentCreated,
            InboundEvent::CardAttachmentCreated(_) => EventKind::CardAttachmentCreated,
            InboundEvent::PushCreated(_) => EventKind::PushCreated,
            InboundEvent::ReleaseCreated(_) => EventKind::ReleaseCreated,
        }
    }
}
