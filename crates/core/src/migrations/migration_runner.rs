use log::{debug, info, warn};
use serde::Serialize;

use super::{migrate_v0_to_v1, migrate_v1_to_v2, ConfigBlob};
use crate::constants::CURRENT_SCHEMA_VERSION;
use crate::errors::{MigrationError, Result};
use crate::settings::{
    read_schema_version, write_json, KeyValueStoreTrait, MIGRATED_KEYS, RETIRED_KEYS,
    SCHEMA_VERSION_KEY,
};

/// One schema transition, from `from_version` to `from_version + 1`.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from_version: u32,
    pub description: &'static str,
    pub migrate: fn(ConfigBlob) -> ConfigBlob,
}

/// Every known transition, in order. A new schema version is added by
/// appending its step here and bumping `CURRENT_SCHEMA_VERSION`.
pub const MIGRATIONS: [Migration; 2] = [
    Migration {
        from_version: 0,
        description: "flat row and column lists become named views",
        migrate: migrate_v0_to_v1,
    },
    Migration {
        from_version: 1,
        description: "underscore metric keys become dotted namespaces",
        migrate: migrate_v1_to_v2,
    },
];

/// Outcome of a startup migration run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    /// Descriptions of the steps applied, in order
    pub steps_applied: Vec<String>,
    pub keys_written: Vec<String>,
    pub keys_removed: Vec<String>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.steps_applied.is_empty()
    }
}

/// Steps must start at version 0 and increase by one.
pub fn validate_migrations(migrations: &[Migration]) -> std::result::Result<(), MigrationError> {
    for (expected, migration) in (0u32..).zip(migrations) {
        if migration.from_version != expected {
            return Err(MigrationError::NonContiguous {
                expected,
                found: migration.from_version,
            });
        }
    }
    Ok(())
}

/// Applies `migrations` while the blob is behind `target_version`. A blob
/// already at or past the target is returned untouched.
pub fn migrate_blob_with(
    mut blob: ConfigBlob,
    migrations: &[Migration],
    target_version: u32,
) -> Result<ConfigBlob> {
    validate_migrations(migrations)?;

    if blob.schema_version > target_version {
        warn!(
            "Stored schema version {} is newer than {}, leaving configuration as is",
            blob.schema_version, target_version
        );
        return Ok(blob);
    }

    while blob.schema_version < target_version {
        let version = blob.schema_version;
        let step = migrations
            .iter()
            .find(|m| m.from_version == version)
            .ok_or(MigrationError::MissingStep(version))?;
        info!(
            "Migrating configuration v{} -> v{}: {}",
            version,
            version + 1,
            step.description
        );
        blob = (step.migrate)(blob);
        blob.schema_version = version + 1;
    }
    Ok(blob)
}

/// Migrates a blob to the current schema version with the built-in steps.
pub fn migrate_blob(blob: ConfigBlob) -> Result<ConfigBlob> {
    migrate_blob_with(blob, &MIGRATIONS, CURRENT_SCHEMA_VERSION)
}

/// Brings the persisted configuration in `store` up to date. Must complete
/// before anything else reads configuration in the session.
///
/// Nothing is written when the stored version is already current. Otherwise
/// every key whose value changed is rewritten, keys the migration dropped are
/// removed, and the version marker is set last. A stored value that is not
/// JSON at all is left in place unless its key is retired.
pub fn run_migrations(store: &dyn KeyValueStoreTrait) -> Result<MigrationReport> {
    let stored_version = read_schema_version(store)?;
    let mut report = MigrationReport {
        from_version: stored_version,
        to_version: stored_version,
        ..Default::default()
    };
    if stored_version >= CURRENT_SCHEMA_VERSION {
        debug!("Configuration already at schema version {}", stored_version);
        return Ok(report);
    }

    let before = ConfigBlob::load(store, &MIGRATED_KEYS)?;
    let after = migrate_blob(before.clone())?;

    report.steps_applied = MIGRATIONS
        .iter()
        .filter(|m| m.from_version >= stored_version && m.from_version < after.schema_version)
        .map(|m| m.description.to_string())
        .collect();

    for key in MIGRATED_KEYS {
        match after.get(key) {
            Some(value) if before.get(key) != Some(value) => {
                write_json(store, key, value)?;
                report.keys_written.push(key.to_string());
            }
            Some(_) => {}
            None => {
                let dropped = before.contains_key(key) || RETIRED_KEYS.contains(&key);
                if dropped && store.get(key)?.is_some() {
                    store.remove(key)?;
                    report.keys_removed.push(key.to_string());
                }
            }
        }
    }

    write_json(store, SCHEMA_VERSION_KEY, &after.schema_version)?;
    report.to_version = after.schema_version;
    info!(
        "Configuration migrated from v{} to v{} ({} keys written, {} removed)",
        report.from_version,
        report.to_version,
        report.keys_written.len(),
        report.keys_removed.len()
    );
    Ok(report)
}
