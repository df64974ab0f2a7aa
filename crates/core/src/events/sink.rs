//! Where services hand off domain events.

use super::DomainEvent;

/// Receiver for events about goals and tasks.
///
/// Services emit only after the change is stored. Delivery is best effort:
/// a sink must not block the caller and has no way to fail the change.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);

    /// Events produced by one operation, in the order they happened.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        events.into_iter().for_each(|event| self.emit(event));
    }
}

/// Drops every event.
#[derive(Clone, Copy, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}
