//! Core error types for the Carteira data core.
//!
//! Only structural configuration problems and persisted-store failures are
//! surfaced as errors. Missing inputs, malformed persisted fragments and
//! unknown metric keys are absorbed by the components that meet them.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the data core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Invalid derivation rules: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Invalid group patterns: {0}")]
    GroupPattern(#[from] GroupPatternError),

    #[error("Migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for persisted-store operations.
///
/// The storage layer converts its own errors (Diesel, r2d2) into this type.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Authoring errors in a derivation rule set. Raised when the rules are
/// loaded, never while deriving.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Derived key '{0}' is declared more than once")]
    DuplicateKey(String),

    #[error("Derived key '{0}' lists itself as an argument")]
    SelfReference(String),

    #[error("Cyclic dependency between derived keys: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("Derived key '{0}' is not a valid metric key")]
    InvalidKey(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupPatternError {
    #[error("Group '{0}' has an empty pattern")]
    EmptyPattern(String),

    #[error("Group '{group}' has a misplaced wildcard in pattern '{pattern}'")]
    MisplacedWildcard { group: String, pattern: String },

    #[error("Group '{0}' is declared more than once")]
    DuplicateGroup(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MigrationError {
    #[error("No migration registered from schema version {0}")]
    MissingStep(u32),

    #[error("Migration steps are not contiguous: expected version {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
