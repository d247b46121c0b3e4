use log::{debug, warn};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{
    data_set_from_value, read_by_class, read_json, read_schema_version, write_json,
    KeyValueStoreTrait, PersistedConfig, Theme, POSITIONS_KEY, THEME_KEY, VIEWS_AVAILABLE_KEY,
    VIEW_SELECTION_KEY,
};
use crate::constants::CURRENT_SCHEMA_VERSION;
use crate::data::{AssetClass, ClassedDataSet, DataSet};
use crate::errors::Result;
use crate::tickers::TickerRenames;
use crate::views::{
    default_view_selection, default_views, ClassViews, ColumnView, RowView, ViewSelection,
    ViewsAvailable,
};

/// Typed access to the persisted configuration. Every getter falls back to
/// the documented default when its key is missing or malformed.
pub trait ConfigServiceTrait: Send + Sync {
    fn load(&self) -> Result<PersistedConfig>;

    fn get_views_available(&self) -> Result<ViewsAvailable>;

    fn save_views_available(&self, views: &ViewsAvailable) -> Result<()>;

    /// Creates or replaces a row view by name.
    fn save_row_view(&self, asset_class: AssetClass, view: RowView) -> Result<()>;

    /// Creates or replaces a column view by name.
    fn save_col_view(&self, asset_class: AssetClass, view: ColumnView) -> Result<()>;

    fn get_view_selection(&self) -> Result<ViewSelection>;

    fn save_view_selection(&self, selection: &ViewSelection) -> Result<()>;

    /// Stored positions, read per asset class and per field so one
    /// unreadable value does not hide the rest.
    fn get_positions(&self) -> Result<ClassedDataSet>;

    /// Stores freshly imported positions, replacing every asset class the
    /// import covers and leaving the other stored classes as they are.
    /// Non-finite numbers are dropped. Returns the positions now persisted.
    fn import_positions(&self, imported: ClassedDataSet) -> Result<ClassedDataSet>;

    fn get_theme(&self) -> Result<Theme>;

    fn set_theme(&self, theme: Theme) -> Result<()>;
}

pub struct ConfigService {
    store: Arc<dyn KeyValueStoreTrait>,
    renames: TickerRenames,
}

impl ConfigService {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>) -> Self {
        Self::with_renames(store, TickerRenames::builtin().clone())
    }

    pub fn with_renames(store: Arc<dyn KeyValueStoreTrait>, renames: TickerRenames) -> Self {
        ConfigService { store, renames }
    }

    fn fold_positions(&self, positions: ClassedDataSet) -> ClassedDataSet {
        positions
            .into_iter()
            .map(|(asset_class, data_set)| (asset_class, self.renames.fold_positions(&data_set)))
            .collect()
    }
}

fn drop_non_finite(asset_class: AssetClass, mut data_set: DataSet) -> DataSet {
    for (ticker, entry) in data_set.iter_mut() {
        entry.retain(|key, value| {
            let finite = value.is_finite();
            if !finite {
                warn!("Dropping non-finite '{}' of {} in {}", key, ticker, asset_class);
            }
            finite
        });
    }
    data_set
}

impl ConfigServiceTrait for ConfigService {
    fn load(&self) -> Result<PersistedConfig> {
        let schema_version = read_schema_version(self.store.as_ref())?;
        if schema_version < CURRENT_SCHEMA_VERSION {
            warn!(
                "Loading configuration at schema version {} before migrating to {}",
                schema_version, CURRENT_SCHEMA_VERSION
            );
        }

        Ok(PersistedConfig {
            schema_version,
            views_available: self.get_views_available()?,
            view_selection: self.get_view_selection()?,
            positions: self.get_positions()?,
            theme: self.get_theme()?,
        })
    }

    fn get_views_available(&self) -> Result<ViewsAvailable> {
        let views = read_by_class(self.store.as_ref(), VIEWS_AVAILABLE_KEY, |value| {
            match serde_json::from_value::<ClassViews>(value) {
                Ok(class_views) => Some(class_views),
                Err(e) => {
                    warn!("Ignoring malformed class views: {}", e);
                    None
                }
            }
        })?;
        Ok(views.unwrap_or_else(default_views))
    }

    fn save_views_available(&self, views: &ViewsAvailable) -> Result<()> {
        write_json(self.store.as_ref(), VIEWS_AVAILABLE_KEY, views)
    }

    fn save_row_view(&self, asset_class: AssetClass, view: RowView) -> Result<()> {
        let mut views = self.get_views_available()?;
        debug!("Saving row view '{}' for {}", view.name, asset_class);
        views.entry(asset_class).or_default().upsert_row_view(view);
        self.save_views_available(&views)
    }

    fn save_col_view(&self, asset_class: AssetClass, view: ColumnView) -> Result<()> {
        let mut views = self.get_views_available()?;
        debug!("Saving column view '{}' for {}", view.name, asset_class);
        views.entry(asset_class).or_default().upsert_col_view(view);
        self.save_views_available(&views)
    }

    fn get_view_selection(&self) -> Result<ViewSelection> {
        Ok(read_json(self.store.as_ref(), VIEW_SELECTION_KEY)?
            .unwrap_or_else(default_view_selection))
    }

    fn save_view_selection(&self, selection: &ViewSelection) -> Result<()> {
        write_json(self.store.as_ref(), VIEW_SELECTION_KEY, selection)
    }

    fn get_positions(&self) -> Result<ClassedDataSet> {
        let stored = read_by_class(self.store.as_ref(), POSITIONS_KEY, data_set_from_value)?;
        Ok(self.fold_positions(stored.unwrap_or_default()))
    }

    fn import_positions(&self, imported: ClassedDataSet) -> Result<ClassedDataSet> {
        // other classes are kept as stored, readable or not
        let mut stored = match read_json::<Value>(self.store.as_ref(), POSITIONS_KEY)? {
            Some(Value::Object(stored)) => stored,
            Some(_) => {
                warn!("Replacing non-object '{}' on import", POSITIONS_KEY);
                Map::new()
            }
            None => Map::new(),
        };
        for (asset_class, data_set) in self.fold_positions(imported) {
            debug!(
                "Replacing {} positions with {} imported tickers",
                asset_class,
                data_set.len()
            );
            let data_set = drop_non_finite(asset_class, data_set);
            stored.insert(asset_class.to_string(), serde_json::to_value(&data_set)?);
        }
        write_json(self.store.as_ref(), POSITIONS_KEY, &stored)?;
        self.get_positions()
    }

    fn get_theme(&self) -> Result<Theme> {
        Ok(read_json(self.store.as_ref(), THEME_KEY)?.unwrap_or_default())
    }

    fn set_theme(&self, theme: Theme) -> Result<()> {
        write_json(self.store.as_ref(), THEME_KEY, &theme)
    }
}
