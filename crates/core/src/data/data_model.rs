use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Partition of tradable assets. Every data set, view and persisted
/// position list is keyed by one of these.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[default]
    BrStocks,
    BrReits,
    UsStocks,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [
        AssetClass::BrStocks,
        AssetClass::BrReits,
        AssetClass::UsStocks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::BrStocks => "br_stocks",
            AssetClass::BrReits => "br_reits",
            AssetClass::UsStocks => "us_stocks",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetClass::ALL
            .iter()
            .find(|class| class.as_str() == s)
            .copied()
            .ok_or_else(|| Error::InvalidConfigValue(format!("Unknown asset class '{}'", s)))
    }
}

/// A price series together with its scalar summary (e.g. the variation over
/// the charted period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub series: Vec<f64>,
    pub variation: f64,
}

/// Where a value came from and when that source was last refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAttribution {
    pub source: String,
    pub updated_at: String,
}

/// A single metric value as delivered by a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Series(SeriesSummary),
    Source(SourceAttribution),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value survives a JSON round trip. Non-finite numbers
    /// serialize as `null` and would not read back.
    pub fn is_finite(&self) -> bool {
        match self {
            MetricValue::Number(n) => n.is_finite(),
            MetricValue::Series(summary) => {
                summary.variation.is_finite() && summary.series.iter().all(|v| v.is_finite())
            }
            MetricValue::Text(_) | MetricValue::Source(_) => true,
        }
    }

    /// Falsy values (zero, empty text, non-finite numbers) are treated as
    /// "no value" by the derivation engine.
    pub fn is_truthy(&self) -> bool {
        match self {
            MetricValue::Number(n) => n.is_finite() && *n != 0.0,
            MetricValue::Text(s) => !s.is_empty(),
            MetricValue::Series(summary) => summary.variation.is_finite(),
            MetricValue::Source(_) => true,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

/// Metric key -> value for one entity. Absence of a key means "not yet
/// known", never zero.
pub type DataEntry = BTreeMap<String, MetricValue>;

/// Ticker -> entry.
pub type DataSet = BTreeMap<String, DataEntry>;

/// Asset class -> data set.
pub type ClassedDataSet = BTreeMap<AssetClass, DataSet>;
