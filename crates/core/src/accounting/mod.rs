//! Completion accounting - task toggles and the goal counters they drive.

mod accounting_model;
mod accounting_traits;
mod completion_service;

#[cfg(test)]
mod completion_service_tests;

pub use accounting_model::{AccountingConfig, CompletionOutcome};
pub use accounting_traits::CompletionServiceTrait;
pub use completion_service::CompletionService;
