//! Logging domain event sink implementation.

use std::sync::Mutex;

use tokio::sync::mpsc;
use dailysteps_core::events::{DomainEvent, DomainEventSink};

/// Domain event sink for the web server runtime.
///
/// `emit()` only pushes onto an unbounded channel. Events are buffered until
/// `start_worker()` spawns the task that drains and logs them.
pub struct LoggingDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl LoggingDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Starts the background worker. Returns false if it was already started.
    pub fn start_worker(&self) -> bool {
        let rx = self
            .rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(mut rx) = rx else {
            tracing::warn!("Domain event worker already started");
            return false;
        };

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                log_event(&event);
            }
            tracing::debug!("Domain event channel closed");
        });
        true
    }
}

impl Default for LoggingDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

fn log_event(event: &DomainEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => tracing::info!(goal_id = event.goal_id(), "domain event {}", payload),
        Err(e) => tracing::warn!("Failed to serialize domain event {:?}: {}", event, e),
    }
}

impl DomainEventSink for LoggingDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Only fails once the worker is gone, i.e. during shutdown.
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Dropped domain event after shutdown: {:?}", e.0);
        }
    }
}
