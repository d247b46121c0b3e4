use serde::{Deserialize, Serialize};

use crate::constants::CURRENT_SCHEMA_VERSION;
use crate::data::ClassedDataSet;
use crate::views::{default_view_selection, default_views, ViewSelection, ViewsAvailable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Everything the dashboard persists, each fragment already defaulted when
/// missing or malformed in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    pub schema_version: u32,
    pub views_available: ViewsAvailable,
    pub view_selection: ViewSelection,
    pub positions: ClassedDataSet,
    pub theme: Theme,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        PersistedConfig {
            schema_version: CURRENT_SCHEMA_VERSION,
            views_available: default_views(),
            view_selection: default_view_selection(),
            positions: ClassedDataSet::new(),
            theme: Theme::default(),
        }
    }
}
