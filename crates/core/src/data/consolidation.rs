use log::debug;

use super::{merge_depth2, ClassedDataSet};
use crate::derivation::DerivationRegistry;

/// Merges classed fragments in arrival order (later fragments win per
/// field) and augments every asset class with its derived metrics.
pub fn consolidate(fragments: &[ClassedDataSet], registry: &DerivationRegistry) -> ClassedDataSet {
    let merged = fragments
        .iter()
        .fold(ClassedDataSet::new(), |acc, fragment| {
            merge_depth2(Some(&acc), Some(fragment))
        });

    debug!(
        "Consolidated {} fragments into {} asset classes",
        fragments.len(),
        merged.len()
    );

    merged
        .into_iter()
        .map(|(asset_class, data_set)| {
            let derived = registry.derive_all(&data_set, asset_class);
            (asset_class, derived)
        })
        .collect()
}
