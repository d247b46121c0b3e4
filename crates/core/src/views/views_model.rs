use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DEFAULT_VIEW_NAME;
use crate::data::AssetClass;
use crate::keys::{
    FUNDAMENTALS_DY, FUNDAMENTALS_P_VP, POSITION_AVERAGE_PRICE, POSITION_GAIN, POSITION_QUANTITY,
    POSITION_TOTAL_VALUE, QUOTE_PRICE,
};

/// A named, user-selectable list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View<T> {
    pub name: String,
    #[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
    pub items: Vec<T>,
}

impl<T> View<T> {
    pub fn new(name: &str, items: Vec<T>) -> Self {
        View {
            name: name.to_string(),
            items,
        }
    }
}

/// Column selection: metric keys shown under one group header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub group: String,
    #[serde(default)]
    pub keys: Vec<String>,
}

/// Tickers shown as rows.
pub type RowView = View<String>;

pub type ColumnView = View<ColumnGroup>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassViews {
    #[serde(default)]
    pub row_views: Vec<RowView>,
    #[serde(default)]
    pub col_views: Vec<ColumnView>,
}

fn upsert<T>(views: &mut Vec<View<T>>, view: View<T>) {
    match views.iter_mut().find(|existing| existing.name == view.name) {
        Some(existing) => *existing = view,
        None => views.push(view),
    }
}

impl ClassViews {
    /// Replaces the row view with the same name, or appends it.
    pub fn upsert_row_view(&mut self, view: RowView) {
        upsert(&mut self.row_views, view);
    }

    pub fn upsert_col_view(&mut self, view: ColumnView) {
        upsert(&mut self.col_views, view);
    }

    pub fn remove_row_view(&mut self, name: &str) -> bool {
        let before = self.row_views.len();
        self.row_views.retain(|view| view.name != name);
        before != self.row_views.len()
    }

    pub fn remove_col_view(&mut self, name: &str) -> bool {
        let before = self.col_views.len();
        self.col_views.retain(|view| view.name != name);
        before != self.col_views.len()
    }
}

pub type ViewsAvailable = BTreeMap<AssetClass, ClassViews>;

/// Which views are active: the asset class on screen and, per class, the
/// names of the selected row and column views (multi-select).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSelection {
    #[serde(default)]
    pub asset_class: AssetClass,
    #[serde(default)]
    pub row_view_names: BTreeMap<AssetClass, Vec<String>>,
    #[serde(default)]
    pub col_view_names: BTreeMap<AssetClass, Vec<String>>,
}

impl ViewSelection {
    /// Union of the items of the selected row views, first occurrence wins.
    /// Names with no matching view are skipped.
    pub fn selected_rows(&self, asset_class: AssetClass, views: &ViewsAvailable) -> Vec<String> {
        let mut rows: Vec<String> = Vec::new();
        let (Some(names), Some(class_views)) =
            (self.row_view_names.get(&asset_class), views.get(&asset_class))
        else {
            return rows;
        };
        for name in names {
            if let Some(view) = class_views.row_views.iter().find(|v| &v.name == name) {
                for ticker in &view.items {
                    if !rows.contains(ticker) {
                        rows.push(ticker.clone());
                    }
                }
            }
        }
        rows
    }

    /// Column groups of the selected column views, in selection order.
    pub fn selected_columns(
        &self,
        asset_class: AssetClass,
        views: &ViewsAvailable,
    ) -> Vec<ColumnGroup> {
        let (Some(names), Some(class_views)) =
            (self.col_view_names.get(&asset_class), views.get(&asset_class))
        else {
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|name| class_views.col_views.iter().find(|v| &v.name == name))
            .flat_map(|view| view.items.iter().cloned())
            .collect()
    }
}

fn default_columns(asset_class: AssetClass) -> Vec<ColumnGroup> {
    let mut columns = vec![
        ColumnGroup {
            group: "Posição".to_string(),
            keys: vec![
                POSITION_QUANTITY.to_string(),
                POSITION_AVERAGE_PRICE.to_string(),
                POSITION_TOTAL_VALUE.to_string(),
                POSITION_GAIN.to_string(),
            ],
        },
        ColumnGroup {
            group: "Cotação".to_string(),
            keys: vec![QUOTE_PRICE.to_string()],
        },
    ];
    if asset_class != AssetClass::UsStocks {
        columns.push(ColumnGroup {
            group: "Fundamentos".to_string(),
            keys: vec![FUNDAMENTALS_DY.to_string(), FUNDAMENTALS_P_VP.to_string()],
        });
    }
    columns
}

/// System views every installation starts with. The default row view is
/// empty: it lists whatever tickers the user holds.
pub fn default_views() -> ViewsAvailable {
    AssetClass::ALL
        .iter()
        .map(|&asset_class| {
            let views = ClassViews {
                row_views: vec![View::new(DEFAULT_VIEW_NAME, Vec::new())],
                col_views: vec![View::new(DEFAULT_VIEW_NAME, default_columns(asset_class))],
            };
            (asset_class, views)
        })
        .collect()
}

pub fn default_view_selection() -> ViewSelection {
    let names: BTreeMap<AssetClass, Vec<String>> = AssetClass::ALL
        .iter()
        .map(|&asset_class| (asset_class, vec![DEFAULT_VIEW_NAME.to_string()]))
        .collect();
    ViewSelection {
        asset_class: AssetClass::default(),
        row_view_names: names.clone(),
        col_view_names: names,
    }
}

impl Default for ViewSelection {
    fn default() -> Self {
        default_view_selection()
    }
}
