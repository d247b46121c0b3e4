use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use carteira_core::errors::Result;
use carteira_core::settings::KeyValueStoreTrait;

/// Key-value store over the `app_settings` table. Values are stored as the
/// JSON text the core hands over.
pub struct SettingsRepository {
    pool: Arc<DbPool>,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SettingsRepository { pool }
    }

    /// Every stored setting, ordered by key.
    pub fn get_all(&self) -> Result<Vec<AppSettingDB>> {
        let mut conn = get_connection(&self.pool)?;
        let all_settings = app_settings
            .order(setting_key.asc())
            .load::<AppSettingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(all_settings)
    }
}

impl KeyValueStoreTrait for SettingsRepository {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = app_settings
            .filter(setting_key.eq(key))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::replace_into(app_settings)
            .values(&AppSettingDB {
                setting_key: key.to_string(),
                setting_value: value.to_string(),
            })
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        debug!("Stored setting '{}'", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::delete(app_settings.filter(setting_key.eq(key)))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init, run_migrations};
    use carteira_core::migrations;
    use carteira_core::settings::{
        ConfigService, ConfigServiceTrait, Theme, LEGACY_ROWS_KEY, SCHEMA_VERSION_KEY,
    };
    use tempfile::TempDir;

    fn setup() -> (TempDir, SettingsRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db");
        let db_path = db_path.to_str().unwrap();
        // `init` is exercised separately; it honours DATABASE_URL
        let pool = create_pool(db_path).unwrap();
        run_migrations(&pool).unwrap();
        (dir, SettingsRepository::new(pool))
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, repo) = setup();
        assert_eq!(repo.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let (_dir, repo) = setup();
        repo.set("theme", r#""light""#).unwrap();
        repo.set("theme", r#""dark""#).unwrap();

        assert_eq!(repo.get("theme").unwrap().as_deref(), Some(r#""dark""#));
        assert_eq!(repo.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_remove() {
        let (_dir, repo) = setup();
        repo.set("rows", "[]").unwrap();
        repo.remove("rows").unwrap();
        repo.remove("rows").unwrap();
        assert_eq!(repo.get("rows").unwrap(), None);
    }

    #[test]
    fn test_init_creates_directory() {
        if std::env::var("DATABASE_URL").is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("nested").join("data");
        let db_path = init(app_dir.to_str().unwrap()).unwrap();
        assert!(app_dir.exists());
        assert!(db_path.ends_with("app.db"));
    }

    #[test]
    fn test_configuration_migrates_on_sqlite() {
        let (_dir, repo) = setup();
        repo.set(LEGACY_ROWS_KEY, r#"["PETR4","VALE3"]"#).unwrap();

        let report = migrations::run_migrations(&repo).unwrap();
        assert_eq!(report.to_version, 2);
        assert_eq!(repo.get(LEGACY_ROWS_KEY).unwrap(), None);
        assert_eq!(repo.get(SCHEMA_VERSION_KEY).unwrap().as_deref(), Some("2"));

        let repo = Arc::new(repo);
        let service = ConfigService::new(repo.clone());
        service.set_theme(Theme::Dark).unwrap();
        let config = service.load().unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.schema_version, 2);

        let stored: serde_json::Value =
            serde_json::from_str(&repo.get("view_selection").unwrap().unwrap()).unwrap();
        assert_eq!(stored["rowViewNames"]["br_stocks"][0], "Minhas Linhas");
    }
}
