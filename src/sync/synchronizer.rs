//! The synchronizer
//!
//! Subscribes to every inbound event kind, asks the rules what to do and
//! hands planned actions to the dispatcher on their own tasks.

use super::dispatcher::ActionDispatcher;
use super::metrics;
use super::rules::{PlannedAction, RulesEngine};
use crate::bus::{EventBus, EventHandler, EventKind, InboundEvent};
use crate::config::{validate_config_result, SyncConfig};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

/// Event handler wiring the rules to the bus
pub struct Synchronizer {
    rules: RulesEngine,
    dispatcher: ActionDispatcher,
    in_flight: Mutex<JoinSet<()>>,
}

impl Synchronizer {
    /// Create a synchronizer over a validated configuration
    ///
    /// # Errors
    /// Returns a validation error if the configuration is inconsistent.
    pub fn new(config: &SyncConfig, bus: Arc<dyn EventBus>) -> Result<Self> {
        validate_config_result(config)?;

        Ok(Self {
            rules: RulesEngine::from_config(config)?,
            dispatcher: ActionDispatcher::new(bus),
            in_flight: Mutex::new(JoinSet::new()),
        })
    }

    /// Create a synchronizer and subscribe it to all six event kinds
    ///
    /// Keep the returned handle: the bus does not keep the synchronizer alive.
    pub fn start(config: &SyncConfig, bus: Arc<dyn EventBus>) -> Result<Arc<Self>> {
        let synchronizer = Arc::new(Self::new(config, Arc::clone(&bus))?);

        for kind in EventKind::ALL {
            bus.subscribe(kind, synchronizer.clone());
        }

        info!(
            projects = config.projects.len(),
            default = %config.default_project,
            primary = %config.primary_project,
            "Synchronizer started"
        );
        Ok(synchronizer)
    }

    pub fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    /// Decide on an event and dispatch the result without waiting for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn process(&self, event: InboundEvent) {
        let kind = event.kind();
        metrics::record_event_received(kind.as_str());

        match self.rules.decide(&event) {
            Ok(planned) => {
                info!(event = %kind, action = %planned.action.kind(), "Dispatching action");
                self.spawn(planned);
            }
            Err(skip) => {
                metrics::record_event_skipped(kind.as_str(), skip.reason.label());
                info!(
                    event = %kind,
                    reason = %skip.reason,
                    subject = %skip.subject,
                    "Event skipped"
                );
            }
        }
    }

    /// Number of dispatch tasks not yet reaped
    pub fn in_flight(&self) -> usize {
        self.tasks().len()
    }

    /// Wait until every dispatched action and its follow-ups have completed
    pub async fn drain(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.tasks());
            if tasks.is_empty() {
                return;
            }
            while let Some(result) = tasks.join_next().await {
                report(result);
            }
        }
    }

    fn spawn(&self, planned: PlannedAction) {
        let dispatcher = self.dispatcher.clone();
        let mut tasks = self.tasks();

        while let Some(result) = tasks.try_join_next() {
            report(result);
        }
        tasks.spawn(async move { dispatcher.execute(planned).await });
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventHandler for Synchronizer {
    async fn handle(&self, event: InboundEvent) {
        self.process(event);
    }
}

fn report(result: std::result::Result<(), JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Dispatch task did not complete");
    }
}
