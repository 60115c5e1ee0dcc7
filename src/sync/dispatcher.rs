//! Action dispatch and result logging
//!
//! Emits planned actions on the bus and handles their completions. Failures
//! are logged and counted, never retried and never propagated.

use super::chain::IssueCreatedContinuation;
use super::metrics;
use super::rules::PlannedAction;
use crate::bus::{ActionFailure, ActionKind, ActionResponse, CreatedIssue, EventBus, OutboundAction};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Emits actions on the injected bus
#[derive(Clone)]
pub struct ActionDispatcher {
    bus: Arc<dyn EventBus>,
}

impl ActionDispatcher {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    /// Emit a planned action, then run its continuation if it succeeded
    pub async fn execute(&self, planned: PlannedAction) {
        let PlannedAction {
            action,
            continuation,
        } = planned;

        let Some(response) = self.emit(action).await else {
            return;
        };

        if let Some(continuation) = continuation {
            self.issue_created(&continuation, &response).await;
        }
    }

    /// Emit one action and wait for its completion
    ///
    /// Returns the response on success. Failures are logged here.
    pub async fn emit(&self, action: OutboundAction) -> Option<ActionResponse> {
        let kind = action.kind();
        metrics::record_action_emitted(kind.as_str());

        let start = Instant::now();
        let outcome = self.bus.emit(action).await;
        metrics::record_action_duration(kind.as_str(), start.elapsed().as_secs_f64());

        match outcome {
            Ok(response) => {
                debug!(action = %kind, "Action completed");
                Some(response)
            }
            Err(failure) => {
                log_failure(kind, &failure);
                None
            }
        }
    }

    /// Link card and issue once the create has succeeded
    async fn issue_created(&self, continuation: &IssueCreatedContinuation, response: &ActionResponse) {
        let issue = match CreatedIssue::from_response(response) {
            Ok(issue) => issue,
            Err(failure) => {
                log_failure(ActionKind::IssueCreate, &failure);
                return;
            }
        };

        info!(
            card = %continuation.card_id(),
            project = %continuation.project().name,
            issue = %issue.id,
            url = %issue.url,
            "Issue created for card"
        );

        let follow_ups = continuation.follow_ups(&issue);
        join_all(follow_ups.into_iter().map(|action| self.emit(action))).await;
    }
}

fn log_failure(kind: ActionKind, failure: &ActionFailure) {
    metrics::record_action_failure(kind.as_str());
    error!(
        action = %kind,
        error = %failure.error,
        response = ?failure.response,
        "Action failed"
    );
}
