//! Event bus port
//!
//! The bus is an external collaborator: it delivers webhook events from
//! Trello and GitHub and carries our actions to the service adapters. This
//! module defines the contract cardsync consumes, the event and action
//! payloads, and an in-process implementation used for tests and replay.
//!
//! # Contract
//!
//! - `subscribe(kind, handler)`: register a handler for one inbound event kind
//! - `emit(action)`: publish an action; resolves once the adapter has
//!   completed it, with the response or an [`ActionFailure`]
//!
//! Delivery guarantees, retries and timeouts belong to the bus, not to
//! its callers.

mod action;
mod event;
mod memory;

use async_trait::async_trait;
use std::sync::Arc;

pub use action::{
    ActionFailure, ActionKind, ActionOutcome, ActionResponse, CardCommentCreate, CardUpdate,
    CreatedIssue, IssueCommentCreate, IssueCreate, IssueState, IssueTarget, IssueUpdate, JobBuild,
    JobParams, OutboundAction,
};
pub use event::{
    CardAttachmentEvent, CardCommentEvent, CardEvent, CardRef, EventKind, InboundEvent, PushEvent,
    ReleaseEvent, RepositoryRef, TrelloUser,
};
pub use memory::{DryRunResponder, EmittedAction, InMemoryBus, Responder};

/// Receiver of inbound events
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one event
    ///
    /// Must not wait on the actions it emits; the bus may deliver the next
    /// event as soon as this returns.
    async fn handle(&self, event: InboundEvent);
}

/// Event bus contract
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Register a handler for an inbound event kind
    ///
    /// The caller owns the handler. Handlers often hold the bus themselves,
    /// so implementations should keep only a weak reference.
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>);

    /// Publish an outbound action and wait for its completion
    async fn emit(&self, action: OutboundAction) -> ActionOutcome;
}
