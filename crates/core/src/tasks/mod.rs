//! Tasks module - generation, domain models, services, and traits.

mod task_generation;
mod tasks_model;
mod tasks_service;
mod tasks_traits;

pub use task_generation::{generate_tasks, task_description, task_title};
pub use tasks_model::{CompletionChange, NewTask, Task};
pub use tasks_service::TaskService;
pub use tasks_traits::{TaskRepositoryTrait, TaskServiceTrait};
