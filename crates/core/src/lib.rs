//! Daily Steps Core - Goals, generated tasks, completion accounting and streaks.
//!
//! This crate contains the domain logic for Daily Steps.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod accounting;
pub mod constants;
pub mod errors;
pub mod events;
pub mod goals;
pub mod identity;
#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;
pub mod streaks;
pub mod tasks;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
