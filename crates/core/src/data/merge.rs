//! Merge engine.
//!
//! Every function here is pure: it clones what it keeps from `a`, layers
//! `b` on top and returns a new structure. An absent operand is the
//! identity. On collisions `b` wins, which models "last writer wins" for
//! live fragments arriving after an initial batch fetch.

use std::collections::BTreeMap;

use super::{ClassedDataSet, DataSet};

fn merge_map<K, V, F>(
    a: Option<&BTreeMap<K, V>>,
    b: Option<&BTreeMap<K, V>>,
    merge_value: F,
) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
    F: Fn(&V, &V) -> V,
{
    let mut merged = a.cloned().unwrap_or_default();
    if let Some(b) = b {
        for (key, newer) in b {
            let value = match merged.get(key) {
                Some(older) => merge_value(older, newer),
                None => newer.clone(),
            };
            merged.insert(key.clone(), value);
        }
    }
    merged
}

/// Entity-level merge: an entity present in `b` replaces the one in `a`
/// entirely.
pub fn merge_depth1(a: Option<&DataSet>, b: Option<&DataSet>) -> DataSet {
    merge_map(a, b, |_, newer| newer.clone())
}

/// Field-level merge of two data sets: per entity, fields present in `b`
/// overwrite, fields only in `a` are retained.
pub fn merge_data_sets(a: Option<&DataSet>, b: Option<&DataSet>) -> DataSet {
    merge_map(a, b, |older, newer| {
        merge_map(Some(older), Some(newer), |_, value| value.clone())
    })
}

/// Per asset class, per entity, per field merge.
pub fn merge_depth2(a: Option<&ClassedDataSet>, b: Option<&ClassedDataSet>) -> ClassedDataSet {
    merge_map(a, b, |older, newer| merge_data_sets(Some(older), Some(newer)))
}

/// Depth-2 merge under one extra outer dimension (e.g. persisted blobs keyed
/// by a historical name).
pub fn merge_depth3<K>(
    a: Option<&BTreeMap<K, ClassedDataSet>>,
    b: Option<&BTreeMap<K, ClassedDataSet>>,
) -> BTreeMap<K, ClassedDataSet>
where
    K: Ord + Clone,
{
    merge_map(a, b, |older, newer| merge_depth2(Some(older), Some(newer)))
}
