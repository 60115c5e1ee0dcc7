//! Trello / GitHub / Jenkins synchronization
//!
//! # Flow
//!
//! 1. The bus delivers an inbound event to the [`Synchronizer`]
//! 2. The [`RulesEngine`] checks origin and tracking guards, resolves the
//!    project and plans at most one action
//! 3. The [`ActionDispatcher`] emits it on its own task and logs the result
//! 4. A successful issue create runs its [`IssueCreatedContinuation`]: three
//!    independent writes linking the card and the issue
//!
//! Nothing here keeps state between events. The only link between a card
//! and its issue is the marker in the card title.

mod chain;
mod dispatcher;
pub mod metrics;
mod rules;
mod synchronizer;

pub use chain::IssueCreatedContinuation;
pub use dispatcher::ActionDispatcher;
pub use rules::{author_prefix, Decision, PlannedAction, RulesEngine, Skip, SkipReason};
pub use synchronizer::Synchronizer;
