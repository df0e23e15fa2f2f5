//! Event sinks.

use std::sync::{Arc, Mutex, PoisonError};

use autoclaim_core::{AccountId, EventSink, ProgressEvent, Severity};
use tracing::{debug, error, info, warn};

/// Re-emits every event as a `tracing` event at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        let ProgressEvent {
            account,
            service,
            stage,
            severity,
            message,
            ..
        } = event;
        let tag = service.tag();

        match severity {
            Severity::Debug => {
                debug!(account = %account, service = tag, stage = %stage, "{message}");
            }
            Severity::Info => info!(account = %account, service = tag, stage = %stage, "{message}"),
            Severity::Warn => warn!(account = %account, service = tag, stage = %stage, "{message}"),
            Severity::Error => {
                error!(account = %account, service = tag, stage = %stage, "{message}");
            }
        }
    }
}

/// Keeps events in memory, optionally forwarding them to another sink.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
    forward: Option<Arc<dyn EventSink>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder that also passes every event to `inner`.
    pub fn forwarding(inner: Arc<dyn EventSink>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            forward: Some(inner),
        }
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events recorded for one account.
    pub fn for_account(&self, account: &AccountId) -> Vec<ProgressEvent> {
        self.events()
            .into_iter()
            .filter(|e| &e.account == account)
            .collect()
    }

    /// Number of events at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        if let Some(inner) = &self.forward {
            inner.emit(event.clone());
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl std::fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSink")
            .field("events", &self.events.lock().map(|e| e.len()).unwrap_or(0))
            .field("forwarding", &self.forward.is_some())
            .finish()
    }
}
