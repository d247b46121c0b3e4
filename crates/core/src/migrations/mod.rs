//! Migrations module - moves a persisted configuration forward through the
//! schema versions, one ordered step at a time.

mod config_blob;
mod key_renames;
mod migration_runner;
mod migration_steps;


pub use config_blob::ConfigBlob;
pub use key_renames::{rename_entry_keys, rename_key, rename_metric_key, KEY_RENAME_TABLE};
pub use migration_runner::{
    migrate_blob, migrate_blob_with, run_migrations, validate_migrations, Migration,
    MigrationReport, MIGRATIONS,
};
pub use migration_steps::{migrate_v0_to_v1, migrate_v1_to_v2};
