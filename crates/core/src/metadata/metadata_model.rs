use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::{AssetClass, ClassedDataSet, DataSet};
use crate::keys::get_prefix;

/// Source attribution for a key prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassMetadata {
    /// Tickers that belong to the class
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Every metric key available for the class
    #[serde(default)]
    pub schema: Vec<String>,
    /// Human readable labels, keyed by metric key or prefix
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Source attribution, keyed by prefix
    #[serde(default)]
    pub sources: BTreeMap<String, SourceInfo>,
}

impl AssetClassMetadata {
    pub fn contains_ticker(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }

    /// Label of `key`, or of its nearest labelled ancestor prefix.
    pub fn label_for(&self, key: &str) -> Option<&str> {
        let mut current = key;
        while !current.is_empty() {
            if let Some(label) = self.labels.get(current) {
                return Some(label);
            }
            current = get_prefix(current);
        }
        None
    }

    /// Source of `key`, found on its nearest ancestor prefix.
    pub fn source_for(&self, key: &str) -> Option<&SourceInfo> {
        let mut current = get_prefix(key);
        while !current.is_empty() {
            if let Some(source) = self.sources.get(current) {
                return Some(source);
            }
            current = get_prefix(current);
        }
        None
    }
}

pub type Metadata = BTreeMap<AssetClass, AssetClassMetadata>;

pub fn asset_class_of(metadata: &Metadata, ticker: &str) -> Option<AssetClass> {
    metadata
        .iter()
        .find(|(_, class_metadata)| class_metadata.contains_ticker(ticker))
        .map(|(asset_class, _)| *asset_class)
}

/// Splits a flat data set by asset class. Tickers no asset class claims are
/// omitted.
pub fn partition_by_asset_class(data_set: DataSet, metadata: &Metadata) -> ClassedDataSet {
    let mut partitioned = ClassedDataSet::new();
    for (ticker, entry) in data_set {
        match asset_class_of(metadata, &ticker) {
            Some(asset_class) => {
                partitioned
                    .entry(asset_class)
                    .or_default()
                    .insert(ticker, entry);
            }
            None => warn!("Ticker {} does not belong to any known asset class", ticker),
        }
    }
    partitioned
}
