//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink and writes them to the
//! structured log from a background worker, off the request path.

mod sink;

pub use sink::LoggingDomainEventSink;
