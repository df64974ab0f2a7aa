//! SQLite storage implementation for Daily Steps.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `dailysteps-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for goals and tasks
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Every write is sent to a single writer
//! task that runs it inside an `IMMEDIATE` transaction, so multi-row writes
//! (a goal's task batch, a read-then-write completion toggle) are atomic.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod goals;
pub mod tasks;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use goals::GoalRepository;
pub use tasks::TaskRepository;

// Re-export from dailysteps-core for convenience
pub use dailysteps_core::errors::{DatabaseError, Error, Result};
