/// Longest streak reported; the backward walk stops here.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Upper bound on `total_steps` accepted at goal creation.
pub const MAX_GOAL_STEPS: i32 = 3650;

/// Compare-and-set attempts for a goal counter update before giving up.
pub const DEFAULT_ACCOUNTING_MAX_ATTEMPTS: u32 = 5;

/// Widest window served by completion history queries.
pub const MAX_HISTORY_DAYS: u32 = 366;

/// Window used by the completion chart.
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
