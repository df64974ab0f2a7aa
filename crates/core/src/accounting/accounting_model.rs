use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ACCOUNTING_MAX_ATTEMPTS;
use crate::goals::Goal;
use crate::tasks::Task;

/// Tunables for completion accounting.
#[derive(Debug, Clone, Copy)]
pub struct AccountingConfig {
    /// Compare-and-set attempts per goal counter update. Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_ACCOUNTING_MAX_ATTEMPTS,
        }
    }
}

/// A completion toggle as applied: the stored task, the goal after its
/// counter was adjusted, and the delta that was applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub task: Task,
    pub goal: Goal,
    pub delta: i32,
}
