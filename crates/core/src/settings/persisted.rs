//! Tolerant JSON access to the key-value store.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{KeyValueStoreTrait, SCHEMA_VERSION_KEY};
use crate::data::{AssetClass, DataEntry, DataSet, MetricValue};
use crate::errors::Result;

/// Reads and parses `key`. A missing key and a value that does not parse as
/// `T` both come back as `Ok(None)`; only store failures are errors.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStoreTrait, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring malformed persisted value for '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Reads an object keyed by asset class one class at a time. Unknown
/// classes, and class values `parse` rejects, are skipped instead of
/// discarding the whole value.
pub fn read_by_class<T>(
    store: &dyn KeyValueStoreTrait,
    key: &str,
    parse: impl Fn(Value) -> Option<T>,
) -> Result<Option<BTreeMap<AssetClass, T>>> {
    let Some(value) = read_json::<Value>(store, key)? else {
        return Ok(None);
    };
    let Value::Object(by_class) = value else {
        warn!("Ignoring persisted '{}': not an object", key);
        return Ok(None);
    };
    let parsed = by_class
        .into_iter()
        .filter_map(|(class, value)| match class.parse::<AssetClass>() {
            Ok(asset_class) => parse(value).map(|parsed| (asset_class, parsed)),
            Err(e) => {
                warn!("Skipping persisted '{}' entry: {}", key, e);
                None
            }
        })
        .collect();
    Ok(Some(parsed))
}

/// Parses a stored data set field by field. Entries that are not objects
/// and fields that are not metric values are dropped with a warning.
pub fn data_set_from_value(value: Value) -> Option<DataSet> {
    let Value::Object(tickers) = value else {
        warn!("Ignoring persisted data set: not an object");
        return None;
    };
    let data_set = tickers
        .into_iter()
        .filter_map(|(ticker, entry)| {
            let Value::Object(fields) = entry else {
                warn!("Ignoring persisted entry for {}: not an object", ticker);
                return None;
            };
            let entry: DataEntry = fields
                .into_iter()
                .filter_map(|(field, value)| match serde_json::from_value::<MetricValue>(value) {
                    Ok(value) => Some((field, value)),
                    Err(_) => {
                        warn!("Ignoring unreadable '{}' of {}", field, ticker);
                        None
                    }
                })
                .collect();
            Some((ticker, entry))
        })
        .collect();
    Some(data_set)
}

pub fn write_json<T: Serialize>(store: &dyn KeyValueStoreTrait, key: &str, value: &T) -> Result<()> {
    let serialized = serde_json::to_string(value)?;
    store.set(key, &serialized)
}

/// Stored schema version. Missing or unparseable markers read as 0.
pub fn read_schema_version(store: &dyn KeyValueStoreTrait) -> Result<u32> {
    let Some(raw) = store.get(SCHEMA_VERSION_KEY)? else {
        return Ok(0);
    };
    let parsed = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Ok(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        warn!("Unparseable schema version '{}', treating as 0", raw);
        0
    }))
}
