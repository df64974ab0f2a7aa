//! Streaks module - day streaks and completion history derived from tasks.

mod streaks_calculator;
mod streaks_model;
mod streaks_service;
mod streaks_traits;

#[cfg(test)]
mod streaks_service_tests;

pub use streaks_calculator::{
    current_streak, history_from_index, index_by_due_date, streak_from_index,
};
pub use streaks_model::{DailyCompletion, StreakSummary};
pub use streaks_service::StreakService;
pub use streaks_traits::StreakServiceTrait;
