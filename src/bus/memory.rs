//! In-process event bus
//!
//! Delivers published events to subscribed handlers and answers emitted
//! actions with a [`Responder`] instead of calling real services. Every
//! emitted action is recorded and broadcast, so tests and the `replay`
//! command can observe what the synchronizer asked for.

use super::action::{ActionOutcome, OutboundAction};
use super::event::{EventKind, InboundEvent};
use super::{EventBus, EventHandler};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tokio::sync::broadcast;

/// Default capacity of the emitted-action broadcast channel
pub const DEFAULT_ACTION_CHANNEL_CAPACITY: usize = 256;

/// Produces the completion for an emitted action
pub trait Responder: Send + Sync {
    fn respond(&self, action: &OutboundAction) -> ActionOutcome;
}

impl<F> Responder for F
where
    F: Fn(&OutboundAction) -> ActionOutcome + Send + Sync,
{
    fn respond(&self, action: &OutboundAction) -> ActionOutcome {
        self(action)
    }
}

/// Responder that pretends every action succeeded
///
/// Issue creates get sequential issue numbers starting at `first_issue` and
/// a github.com URL; every other action gets an empty object.
#[derive(Debug)]
pub struct DryRunResponder {
    next_issue: AtomicU64,
}

impl DryRunResponder {
    pub fn new(first_issue: u64) -> Self {
        Self {
            next_issue: AtomicU64::new(first_issue),
        }
    }
}

impl Default for DryRunResponder {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Responder for DryRunResponder {
    fn respond(&self, action: &OutboundAction) -> ActionOutcome {
        match action {
            OutboundAction::IssueCreate(create) => {
                let number = self.next_issue.fetch_add(1, Ordering::SeqCst);
                Ok(json!({
                    "id": number,
                    "url": format!(
                        "https://github.com/{}/{}/issues/{}",
                        create.owner, create.repo, number
                    ),
                }))
            }
            _ => Ok(json!({})),
        }
    }
}

/// An action seen by the in-memory bus
#[derive(Debug, Clone)]
pub struct EmittedAction {
    pub action: OutboundAction,
    pub emitted_at: DateTime<Utc>,
    pub succeeded: bool,
}

/// In-process [`EventBus`]
///
/// Handlers are held weakly: a subscriber that owns the bus handle (as the
/// synchronizer does) is freed once its last outside reference is dropped.
pub struct InMemoryBus {
    handlers: RwLock<HashMap<EventKind, Vec<Weak<dyn EventHandler>>>>,
    emitted: Mutex<Vec<EmittedAction>>,
    responder: Box<dyn Responder>,
    action_tx: broadcast::Sender<OutboundAction>,
}

impl InMemoryBus {
    /// Bus whose actions all succeed with an empty response
    pub fn new() -> Self {
        Self::with_responder(|_: &OutboundAction| -> ActionOutcome { Ok(json!({})) })
    }

    /// Bus answering actions with the given responder
    pub fn with_responder(responder: impl Responder + 'static) -> Self {
        let (action_tx, _) = broadcast::channel(DEFAULT_ACTION_CHANNEL_CAPACITY);

        Self {
            handlers: RwLock::new(HashMap::new()),
            emitted: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            action_tx,
        }
    }

    /// Get a subscriber for emitted actions
    pub fn subscribe_actions(&self) -> broadcast::Receiver<OutboundAction> {
        self.action_tx.subscribe()
    }

    /// Deliver an inbound event to every handler subscribed to its kind
    ///
    /// Returns the number of handlers invoked.
    pub async fn publish(&self, event: InboundEvent) -> usize {
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.kind())
            .map(|subscribed| subscribed.iter().filter_map(Weak::upgrade).collect())
            .unwrap_or_default();

        if handlers.is_empty() {
            tracing::debug!(event = %event.kind(), "Event published but no handlers subscribed");
        }

        for handler in &handlers {
            handler.handle(event.clone()).await;
        }

        handlers.len()
    }

    /// Number of live handlers subscribed to a kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, |subscribed| {
                subscribed.iter().filter(|h| h.strong_count() > 0).count()
            })
    }

    /// Every action emitted so far, in emission order
    pub fn emitted(&self) -> Vec<OutboundAction> {
        self.lock_emitted().iter().map(|r| r.action.clone()).collect()
    }

    /// Every emission record so far
    pub fn records(&self) -> Vec<EmittedAction> {
        self.lock_emitted().clone()
    }

    /// Drain the emitted actions recorded so far
    pub fn take_emitted(&self) -> Vec<OutboundAction> {
        std::mem::take(&mut *self.lock_emitted())
            .into_iter()
            .map(|r| r.action)
            .collect()
    }

    fn lock_emitted(&self) -> std::sync::MutexGuard<'_, Vec<EmittedAction>> {
        self.emitted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryBus {
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let subscribed = handlers.entry(kind).or_default();

        subscribed.retain(|h| h.strong_count() > 0);
        subscribed.push(Arc::downgrade(&handler));
        tracing::debug!(event = %kind, "Handler subscribed");
    }

    async fn emit(&self, action: OutboundAction) -> ActionOutcome {
        // Completion is asynchronous on a real bus; yield so callers never
        // observe it inline.
        tokio::task::yield_now().await;

        let outcome = self.responder.respond(&action);

        self.lock_emitted().push(EmittedAction {
            action: action.clone(),
            emitted_at: Utc::now(),
            succeeded: outcome.is_ok(),
        });

        if self.action_tx.send(action).is_err() {
            tracing::trace!("Action emitted but no action subscribers");
        }

        outcome
    }
}
