//! SQLite storage implementation for Carteira.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the key-value store trait defined in `carteira-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The settings repository backing the persisted configuration
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` crate is database-agnostic and works with traits.
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

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod settings;

// Re-export database utilities
pub use db::{create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from carteira-core for convenience
pub use carteira_core::errors::{DatabaseError, Error, Result};
