use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::data::{merge_depth2, AssetClass, ClassedDataSet, DataSet};

/// Tickers subscribed to the live feed, per asset class.
///
/// Owned by whoever drives the transport; there is no shared instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSubscriptions {
    subscribed: BTreeMap<AssetClass, BTreeSet<String>>,
}

impl LiveSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the ticker was already subscribed.
    pub fn add_subscription(&mut self, asset_class: AssetClass, ticker: &str) -> bool {
        self.subscribed
            .entry(asset_class)
            .or_default()
            .insert(ticker.to_string())
    }

    pub fn remove_subscription(&mut self, asset_class: AssetClass, ticker: &str) -> bool {
        let Some(tickers) = self.subscribed.get_mut(&asset_class) else {
            return false;
        };
        let removed = tickers.remove(ticker);
        if tickers.is_empty() {
            self.subscribed.remove(&asset_class);
        }
        removed
    }

    pub fn is_subscribed(&self, asset_class: AssetClass, ticker: &str) -> bool {
        self.subscribed
            .get(&asset_class)
            .is_some_and(|tickers| tickers.contains(ticker))
    }

    pub fn subscriptions(&self, asset_class: AssetClass) -> Vec<&str> {
        self.subscribed
            .get(&asset_class)
            .map(|tickers| tickers.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Layers an incoming fragment for `asset_class` over `current`, field
    /// by field, newest wins. Entities nobody subscribed to are dropped
    /// from the fragment first.
    pub fn dispatch(
        &self,
        current: &ClassedDataSet,
        asset_class: AssetClass,
        fragment: &DataSet,
    ) -> ClassedDataSet {
        let accepted: DataSet = fragment
            .iter()
            .filter(|(ticker, _)| self.is_subscribed(asset_class, ticker))
            .map(|(ticker, entry)| (ticker.clone(), entry.clone()))
            .collect();
        if accepted.len() < fragment.len() {
            debug!(
                "Dropped {} unsubscribed entities from {} update",
                fragment.len() - accepted.len(),
                asset_class
            );
        }
        if accepted.is_empty() {
            return current.clone();
        }
        let update: ClassedDataSet = BTreeMap::from([(asset_class, accepted)]);
        merge_depth2(Some(current), Some(&update))
    }
}
