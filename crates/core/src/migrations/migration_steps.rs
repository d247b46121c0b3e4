//! The individual schema transitions. Each one is a pure function of the
//! blob it is given.
//!
//! Steps work on the raw JSON tree rather than on the typed models, so a
//! fragment that does not fit the expected shape is carried over untouched
//! instead of failing the whole value.

use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::key_renames::{rename_entry_keys, rename_metric_key};
use super::ConfigBlob;
use crate::constants::{LEGACY_COLUMN_VIEW_NAME, LEGACY_ROW_VIEW_NAME};
use crate::data::AssetClass;
use crate::settings::{
    LEGACY_COLUMNS_KEY, LEGACY_ROWS_KEY, POSITIONS_KEY, VIEWS_AVAILABLE_KEY, VIEW_SELECTION_KEY,
};
use crate::views::{default_view_selection, default_views, ColumnGroup, View};

// persisted field names of the view models
const ROW_VIEWS: &str = "rowViews";
const COL_VIEWS: &str = "colViews";
const ROW_VIEW_NAMES: &str = "rowViewNames";
const COL_VIEW_NAMES: &str = "colViewNames";
const NAME: &str = "name";
const ITEMS: &str = "items";
const GROUP: &str = "group";
const KEYS: &str = "keys";

fn parse_items<T: DeserializeOwned>(items: Vec<Value>, key: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping malformed item in legacy '{}': {}", key, e);
                None
            }
        })
        .collect()
}

/// Version 0 kept either one flat list for the default asset class or one
/// list per asset class.
fn legacy_by_class<T: DeserializeOwned>(
    value: Option<Value>,
    key: &str,
) -> BTreeMap<AssetClass, Vec<T>> {
    match value {
        None => BTreeMap::new(),
        Some(Value::Array(items)) => {
            BTreeMap::from([(AssetClass::default(), parse_items(items, key))])
        }
        Some(Value::Object(by_class)) => by_class
            .into_iter()
            .filter_map(|(class, items)| {
                let asset_class = match class.parse::<AssetClass>() {
                    Ok(asset_class) => asset_class,
                    Err(e) => {
                        warn!("Skipping legacy '{}' entry: {}", key, e);
                        return None;
                    }
                };
                match items {
                    Value::Array(items) => Some((asset_class, parse_items(items, key))),
                    _ => {
                        warn!("Skipping legacy '{}' for {}: not a list", key, asset_class);
                        None
                    }
                }
            })
            .collect(),
        Some(_) => {
            warn!("Dropping malformed legacy '{}': not a list", key);
            BTreeMap::new()
        }
    }
}

/// The stored object, or `default` serialized when it is missing or not an
/// object.
fn object_or_default<T: Serialize>(
    value: Option<Value>,
    key: &str,
    default: impl FnOnce() -> T,
) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => return map,
        Some(_) => warn!("Replacing malformed '{}' with defaults", key),
        None => {}
    }
    match serde_json::to_value(default()) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            error!("Failed to serialize default '{}': {}", key, e);
            Map::new()
        }
    }
}

/// Object stored under `key` of `map`, taken out of it. Anything but an
/// object reads as empty.
fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(child)) => child,
        Some(_) => {
            warn!("Replacing malformed '{}' during migration", key);
            Map::new()
        }
        None => Map::new(),
    }
}

/// Replaces the view named like `view` in the list under `field`, or
/// appends it.
fn upsert_view(class_views: &mut Map<String, Value>, field: &str, view: Value) {
    let mut views = match class_views.remove(field) {
        Some(Value::Array(views)) => views,
        Some(_) => {
            warn!("Replacing malformed '{}' during migration", field);
            Vec::new()
        }
        None => Vec::new(),
    };
    let name = view.get(NAME).cloned();
    match views.iter_mut().find(|existing| existing.get(NAME) == name.as_ref()) {
        Some(existing) => *existing = view,
        None => views.push(view),
    }
    class_views.insert(field.to_string(), Value::Array(views));
}

fn add_legacy_view<T: Serialize>(
    views: &mut Map<String, Value>,
    selection: &mut Map<String, Value>,
    asset_class: AssetClass,
    (views_field, names_field): (&str, &str),
    view: View<T>,
) {
    let view_value = match serde_json::to_value(&view) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to serialize view '{}': {}", view.name, e);
            return;
        }
    };
    debug!(
        "Creating '{}' with {} items for {}",
        view.name,
        view.items.len(),
        asset_class
    );

    let class_key = asset_class.to_string();
    let mut class_views = take_object(views, &class_key);
    upsert_view(&mut class_views, views_field, view_value);
    views.insert(class_key.clone(), Value::Object(class_views));

    let mut names = take_object(selection, names_field);
    names.insert(class_key, Value::Array(vec![Value::String(view.name)]));
    selection.insert(names_field.to_string(), Value::Object(names));
}

/// v0 → v1: flat row and column lists become named views.
///
/// Each legacy list turns into a "Minhas Linhas" / "Minhas Colunas" view
/// next to the existing (or system-default) views, and the selection points
/// at it. The legacy keys are removed. Without legacy keys this is a no-op.
pub fn migrate_v0_to_v1(mut blob: ConfigBlob) -> ConfigBlob {
    let legacy_rows = blob.remove(LEGACY_ROWS_KEY);
    let legacy_columns = blob.remove(LEGACY_COLUMNS_KEY);
    if legacy_rows.is_none() && legacy_columns.is_none() {
        return blob;
    }

    let rows: BTreeMap<AssetClass, Vec<String>> = legacy_by_class(legacy_rows, LEGACY_ROWS_KEY);
    let columns: BTreeMap<AssetClass, Vec<ColumnGroup>> =
        legacy_by_class(legacy_columns, LEGACY_COLUMNS_KEY);

    let mut views = object_or_default(
        blob.remove(VIEWS_AVAILABLE_KEY),
        VIEWS_AVAILABLE_KEY,
        default_views,
    );
    let mut selection = object_or_default(
        blob.remove(VIEW_SELECTION_KEY),
        VIEW_SELECTION_KEY,
        default_view_selection,
    );

    for (asset_class, tickers) in rows {
        add_legacy_view(
            &mut views,
            &mut selection,
            asset_class,
            (ROW_VIEWS, ROW_VIEW_NAMES),
            View::new(LEGACY_ROW_VIEW_NAME, tickers),
        );
    }
    for (asset_class, groups) in columns {
        add_legacy_view(
            &mut views,
            &mut selection,
            asset_class,
            (COL_VIEWS, COL_VIEW_NAMES),
            View::new(LEGACY_COLUMN_VIEW_NAME, groups),
        );
    }

    blob.set(VIEWS_AVAILABLE_KEY, Value::Object(views));
    blob.set(VIEW_SELECTION_KEY, Value::Object(selection));
    blob
}

fn rename_column_group(group: &mut Value) {
    if let Some(Value::String(name)) = group.get_mut(GROUP) {
        *name = rename_metric_key(name);
    }
    if let Some(Value::Array(keys)) = group.get_mut(KEYS) {
        let mut renamed: Vec<Value> = Vec::with_capacity(keys.len());
        for key in keys.drain(..) {
            let key = match key {
                Value::String(key) => Value::String(rename_metric_key(&key)),
                other => other,
            };
            if !renamed.contains(&key) {
                renamed.push(key);
            }
        }
        *keys = renamed;
    }
}

fn rename_views(views: &mut Value) {
    let Value::Object(by_class) = views else {
        warn!("Leaving non-object '{}' as is", VIEWS_AVAILABLE_KEY);
        return;
    };
    for class_views in by_class.values_mut() {
        let Some(Value::Array(col_views)) = class_views.get_mut(COL_VIEWS) else {
            continue;
        };
        for view in col_views {
            if let Some(Value::Array(items)) = view.get_mut(ITEMS) {
                items.iter_mut().for_each(rename_column_group);
            }
        }
    }
}

fn rename_positions(positions: &mut Value) {
    let Value::Object(by_class) = positions else {
        warn!("Leaving non-object '{}' as is", POSITIONS_KEY);
        return;
    };
    for data_set in by_class.values_mut() {
        let Value::Object(data_set) = data_set else {
            continue;
        };
        for entry in data_set.values_mut() {
            if let Value::Object(fields) = entry {
                let renamed = rename_entry_keys(std::mem::take(fields).into_iter().collect());
                *fields = renamed.into_iter().collect();
            }
        }
    }
}

/// v1 → v2: underscore-segment metric keys become dotted namespaces, in
/// column views and in stored positions. Values are carried over as they
/// are, parseable or not.
pub fn migrate_v1_to_v2(mut blob: ConfigBlob) -> ConfigBlob {
    if let Some(views) = blob.get_mut(VIEWS_AVAILABLE_KEY) {
        rename_views(views);
    }
    if let Some(positions) = blob.get_mut(POSITIONS_KEY) {
        rename_positions(positions);
    }
    blob
}
