use log::debug;
use std::collections::BTreeMap;

use super::DerivationRules;
use crate::data::{AssetClass, DataSet};

/// Rule sets keyed by asset class.
#[derive(Debug, Clone, Default)]
pub struct DerivationRegistry {
    rules_by_class: BTreeMap<AssetClass, DerivationRules>,
}

impl DerivationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, asset_class: AssetClass, rules: DerivationRules) {
        self.rules_by_class.insert(asset_class, rules);
    }

    pub fn rules_for(&self, asset_class: AssetClass) -> Option<&DerivationRules> {
        self.rules_by_class.get(&asset_class)
    }

    /// Returns `data_set` with the derived metrics of `asset_class` merged
    /// into each entity. A class without rules passes through unchanged.
    pub fn derive_all(&self, data_set: &DataSet, asset_class: AssetClass) -> DataSet {
        match self.rules_by_class.get(&asset_class) {
            Some(rules) => rules.derive_all(data_set),
            None => {
                debug!("No derivation rules registered for {}", asset_class);
                data_set.clone()
            }
        }
    }
}
