//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. The HTTP server implements the
//! sink to log them.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
