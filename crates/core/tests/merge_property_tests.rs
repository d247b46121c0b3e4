//! Property-based tests for the merge engine.
//!
//! These tests check the merge laws over random data sets, using the
//! `proptest` crate for random test case generation.

use carteira_core::data::{
    merge_depth1, merge_depth2, AssetClass, ClassedDataSet, DataEntry, DataSet, MetricValue,
};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Finite numbers or short text. NaN would break equality.
fn arb_value() -> impl Strategy<Value = MetricValue> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(MetricValue::Number),
        "[a-z]{1,8}".prop_map(MetricValue::Text),
    ]
}

/// Small key space so operands collide often.
fn arb_entry() -> impl Strategy<Value = DataEntry> {
    proptest::collection::btree_map("[a-c]\\.[x-z]", arb_value(), 0..6)
}

fn arb_data_set() -> impl Strategy<Value = DataSet> {
    proptest::collection::btree_map("[A-D]{4}", arb_entry(), 0..5)
}

fn arb_asset_class() -> impl Strategy<Value = AssetClass> {
    prop_oneof![
        Just(AssetClass::BrStocks),
        Just(AssetClass::BrReits),
        Just(AssetClass::UsStocks),
    ]
}

fn arb_classed() -> impl Strategy<Value = ClassedDataSet> {
    proptest::collection::btree_map(arb_asset_class(), arb_data_set(), 0..3)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Merging a data set with itself changes nothing.
    #[test]
    fn prop_merge_is_idempotent(a in arb_data_set(), c in arb_classed()) {
        prop_assert_eq!(merge_depth1(Some(&a), Some(&a)), a);
        prop_assert_eq!(merge_depth2(Some(&c), Some(&c)), c);
    }

    /// An absent operand is the identity.
    #[test]
    fn prop_absent_operand_is_identity(c in arb_classed()) {
        prop_assert_eq!(merge_depth2(Some(&c), None), c.clone());
        prop_assert_eq!(merge_depth2(None, Some(&c)), c);
    }

    /// Every field present in the newer fragment wins.
    #[test]
    fn prop_newer_fields_win(a in arb_classed(), b in arb_classed()) {
        let merged = merge_depth2(Some(&a), Some(&b));
        for (asset_class, data_set) in &b {
            for (ticker, entry) in data_set {
                for (key, value) in entry {
                    prop_assert_eq!(&merged[asset_class][ticker][key], value);
                }
            }
        }
    }

    /// Fields the newer fragment does not mention survive.
    #[test]
    fn prop_untouched_fields_survive(a in arb_classed(), b in arb_classed()) {
        let merged = merge_depth2(Some(&a), Some(&b));
        for (asset_class, data_set) in &a {
            for (ticker, entry) in data_set {
                for (key, value) in entry {
                    let in_b = b
                        .get(asset_class)
                        .and_then(|ds| ds.get(ticker))
                        .is_some_and(|e| e.contains_key(key));
                    if !in_b {
                        prop_assert_eq!(&merged[asset_class][ticker][key], value);
                    }
                }
            }
        }
    }

    /// Depth 1 replaces whole entities: nothing of `a` leaks into an
    /// entity that `b` carries.
    #[test]
    fn prop_depth1_replaces_entities(a in arb_data_set(), b in arb_data_set()) {
        let merged = merge_depth1(Some(&a), Some(&b));
        for (ticker, entry) in &b {
            prop_assert_eq!(&merged[ticker], entry);
        }
        for ticker in a.keys().filter(|t| !b.contains_key(*t)) {
            prop_assert_eq!(&merged[ticker], &a[ticker]);
        }
    }
}
