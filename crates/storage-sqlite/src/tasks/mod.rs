//! SQLite storage implementation for tasks.

mod model;
mod repository;

pub use model::TaskDB;
pub(crate) use repository::insert_task_rows;
pub use repository::TaskRepository;
