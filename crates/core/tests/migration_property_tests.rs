//! Property-based tests for the configuration migration pipeline.

use carteira_core::constants::{
    CURRENT_SCHEMA_VERSION, LEGACY_COLUMN_VIEW_NAME, LEGACY_ROW_VIEW_NAME,
};
use carteira_core::data::AssetClass;
use carteira_core::migrations::{
    migrate_blob, migrate_blob_with, rename_metric_key, ConfigBlob, MIGRATIONS,
};
use carteira_core::settings::{
    LEGACY_COLUMNS_KEY, LEGACY_ROWS_KEY, POSITIONS_KEY, VIEWS_AVAILABLE_KEY, VIEW_SELECTION_KEY,
};
use carteira_core::views::ViewsAvailable;
use proptest::prelude::*;
use serde_json::{json, Value};

// =============================================================================
// Generators
// =============================================================================

/// Legacy and already-dotted keys, so renames and pass-throughs both occur.
fn arb_metric_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("b3_position.quantity".to_string()),
        Just("b3_position.average_price".to_string()),
        Just("yahoo_quote.price".to_string()),
        Just("derived.b3_position.gain".to_string()),
        Just("derived.yahoo_chart.1mo".to_string()),
        Just("statusinvest.dy".to_string()),
        "[a-z]{2,6}\\.[a-z]{2,6}",
    ]
}

fn arb_rows() -> impl Strategy<Value = Option<Value>> {
    let rows = proptest::collection::vec("[A-Z]{4}[0-9]", 0..5);
    proptest::option::of(rows.prop_map(|rows| json!(rows)))
}

fn arb_columns() -> impl Strategy<Value = Option<Value>> {
    let group = ("[A-Z][a-z]{2,6}", proptest::collection::vec(arb_metric_key(), 0..4))
        .prop_map(|(group, keys)| json!({ "group": group, "keys": keys }));
    proptest::option::of(proptest::collection::vec(group, 0..3).prop_map(Value::Array))
}

/// Mostly numbers, with the odd `null` a corrupted store may hold.
fn arb_position_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (0.0f64..1000.0).prop_map(|n| json!(n)),
        1 => Just(Value::Null),
    ]
}

fn arb_positions() -> impl Strategy<Value = Option<Value>> {
    let entry = proptest::collection::btree_map(arb_metric_key(), arb_position_value(), 0..4);
    let data_set = proptest::collection::btree_map("[A-Z]{4}[0-9]", entry, 0..3);
    proptest::option::of(data_set.prop_map(|ds| json!({ "br_stocks": ds })))
}

fn arb_v0_blob() -> impl Strategy<Value = ConfigBlob> {
    (arb_rows(), arb_columns(), arb_positions()).prop_map(|(rows, columns, positions)| {
        let mut blob = ConfigBlob::new(0);
        for (key, value) in [
            (LEGACY_ROWS_KEY, rows),
            (LEGACY_COLUMNS_KEY, columns),
            (POSITIONS_KEY, positions),
        ] {
            if let Some(value) = value {
                blob.set(key, value);
            }
        }
        blob
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Stopping at v1 and resuming later ends where a single run does.
    #[test]
    fn prop_pipeline_resumes_from_v1(blob in arb_v0_blob()) {
        let direct = migrate_blob(blob.clone()).unwrap();
        let at_v1 = migrate_blob_with(blob, &MIGRATIONS, 1).unwrap();
        prop_assert_eq!(at_v1.schema_version, 1);
        prop_assert_eq!(migrate_blob(at_v1).unwrap(), direct);
    }

    /// A migrated blob is at the current version and migrating it again is
    /// a no-op.
    #[test]
    fn prop_migrated_blob_is_stable(blob in arb_v0_blob()) {
        let migrated = migrate_blob(blob).unwrap();
        prop_assert_eq!(migrated.schema_version, CURRENT_SCHEMA_VERSION);
        prop_assert_eq!(migrate_blob(migrated.clone()).unwrap(), migrated);
    }

    /// Every legacy ticker and column key reappears in the generated views,
    /// keys under their new names.
    #[test]
    fn prop_legacy_lists_are_preserved(blob in arb_v0_blob()) {
        let legacy_rows: Vec<String> = blob.get_as(LEGACY_ROWS_KEY).unwrap_or_default();
        let legacy_keys: Vec<String> = blob
            .get(LEGACY_COLUMNS_KEY)
            .and_then(Value::as_array)
            .map(|groups| {
                groups
                    .iter()
                    .filter_map(|g| g["keys"].as_array())
                    .flatten()
                    .filter_map(|k| k.as_str().map(rename_metric_key))
                    .collect()
            })
            .unwrap_or_default();
        let had_columns = blob.contains_key(LEGACY_COLUMNS_KEY);
        let had_rows = blob.contains_key(LEGACY_ROWS_KEY);

        let migrated = migrate_blob(blob).unwrap();
        prop_assert!(!migrated.contains_key(LEGACY_ROWS_KEY));
        prop_assert!(!migrated.contains_key(LEGACY_COLUMNS_KEY));

        let views: ViewsAvailable = migrated.get_as(VIEWS_AVAILABLE_KEY).unwrap_or_default();
        let stocks = views.get(&AssetClass::BrStocks);

        if had_rows {
            let view = stocks
                .and_then(|v| v.row_views.iter().find(|r| r.name == LEGACY_ROW_VIEW_NAME));
            prop_assert!(view.is_some());
            prop_assert_eq!(&view.unwrap().items, &legacy_rows);
        }
        if had_columns {
            let view = stocks
                .and_then(|v| v.col_views.iter().find(|c| c.name == LEGACY_COLUMN_VIEW_NAME));
            prop_assert!(view.is_some());
            let migrated_keys: Vec<&String> =
                view.unwrap().items.iter().flat_map(|g| g.keys.iter()).collect();
            for key in &legacy_keys {
                prop_assert!(migrated_keys.contains(&key));
            }
        }
    }

    /// Stored positions keep every ticker and every field, unreadable ones
    /// included, and no underscore-style key covered by the rename table
    /// survives.
    #[test]
    fn prop_position_keys_are_renamed(blob in arb_v0_blob()) {
        let original = blob.get(POSITIONS_KEY).cloned();

        let migrated = migrate_blob(blob).unwrap();
        let stocks = |positions: &Value| {
            positions["br_stocks"].as_object().cloned().unwrap_or_default()
        };

        match original {
            None => prop_assert!(!migrated.contains_key(POSITIONS_KEY)),
            Some(original) => {
                let before = stocks(&original);
                let after = stocks(migrated.get(POSITIONS_KEY).unwrap());
                prop_assert_eq!(
                    after.keys().collect::<Vec<_>>(),
                    before.keys().collect::<Vec<_>>()
                );
                for (ticker, entry) in &after {
                    let entry = entry.as_object().unwrap();
                    let old_keys: Vec<String> = before[ticker]
                        .as_object()
                        .unwrap()
                        .keys()
                        .map(|key| rename_metric_key(key))
                        .collect();
                    for key in entry.keys() {
                        prop_assert_eq!(&rename_metric_key(key), key);
                        prop_assert!(old_keys.contains(key));
                    }
                    for key in &old_keys {
                        prop_assert!(entry.contains_key(key));
                    }
                }
            }
        }
    }
}

// =============================================================================
// Reference Fixtures
// =============================================================================

fn padrao_columns(with_fundamentals: bool) -> Value {
    let mut items = vec![
        json!({ "group": "Posição", "keys": [
            "b3.position.quantity",
            "b3.position.average_price",
            "b3.derived.position.total_value",
            "b3.derived.position.gain"
        ] }),
        json!({ "group": "Cotação", "keys": ["yahoo.quote.price"] }),
    ];
    if with_fundamentals {
        items.push(json!({ "group": "Fundamentos", "keys": ["statusinvest.dy", "statusinvest.p_vp"] }));
    }
    json!({ "name": "Padrão", "items": items })
}

#[test]
fn test_flat_v0_store_reaches_expected_v2() {
    let blob = ConfigBlob::new(0)
        .with(LEGACY_ROWS_KEY, json!(["PETR4", "ITSA4"]))
        .with(
            LEGACY_COLUMNS_KEY,
            json!([
                { "group": "b3_position", "keys": [
                    "b3_position.quantity",
                    "b3_position.average_price",
                    "derived.b3_position.gain"
                ] },
                { "group": "Cotação", "keys": ["yahoo_quote.price", "derived.yahoo_chart.1mo"] }
            ]),
        )
        .with(
            POSITIONS_KEY,
            json!({ "br_stocks": { "PETR4": {
                "b3_position.quantity": 100.0,
                "b3_position.average_price": 27.5,
                "b3_dividends.total": 12.0
            } } }),
        );

    let migrated = migrate_blob(blob).unwrap();

    assert_eq!(migrated.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(
        migrated.keys().collect::<Vec<_>>(),
        vec![POSITIONS_KEY, VIEW_SELECTION_KEY, VIEWS_AVAILABLE_KEY]
    );
    assert_eq!(
        migrated.get(VIEWS_AVAILABLE_KEY).unwrap(),
        &json!({
            "br_stocks": {
                "rowViews": [
                    { "name": "Padrão", "items": [] },
                    { "name": "Minhas Linhas", "items": ["PETR4", "ITSA4"] }
                ],
                "colViews": [
                    padrao_columns(true),
                    { "name": "Minhas Colunas", "items": [
                        { "group": "b3.position", "keys": [
                            "b3.position.quantity",
                            "b3.position.average_price",
                            "b3.derived.position.gain"
                        ] },
                        { "group": "Cotação", "keys": ["yahoo.quote.price", "yahoo.derived.chart.1mo"] }
                    ] }
                ]
            },
            "br_reits": {
                "rowViews": [{ "name": "Padrão", "items": [] }],
                "colViews": [padrao_columns(true)]
            },
            "us_stocks": {
                "rowViews": [{ "name": "Padrão", "items": [] }],
                "colViews": [padrao_columns(false)]
            }
        })
    );
    assert_eq!(
        migrated.get(VIEW_SELECTION_KEY).unwrap(),
        &json!({
            "assetClass": "br_stocks",
            "rowViewNames": {
                "br_stocks": ["Minhas Linhas"],
                "br_reits": ["Padrão"],
                "us_stocks": ["Padrão"]
            },
            "colViewNames": {
                "br_stocks": ["Minhas Colunas"],
                "br_reits": ["Padrão"],
                "us_stocks": ["Padrão"]
            }
        })
    );
    assert_eq!(
        migrated.get(POSITIONS_KEY).unwrap(),
        &json!({ "br_stocks": { "PETR4": {
            "b3.position.quantity": 100.0,
            "b3.position.average_price": 27.5,
            "b3.dividends.total": 12.0
        } } })
    );
}

#[test]
fn test_per_class_v0_store_with_user_views_reaches_expected_v2() {
    let blob = ConfigBlob::new(0)
        .with(LEGACY_ROWS_KEY, json!({ "br_reits": ["HGLG11"] }))
        .with(
            LEGACY_COLUMNS_KEY,
            json!({ "us_stocks": [
                { "group": "Quote", "keys": ["yahoo_quote.price", "yahoo_quote.price"] }
            ] }),
        )
        .with(
            VIEWS_AVAILABLE_KEY,
            json!({ "br_reits": { "rowViews": [
                { "name": "Logística", "items": ["BTLG11"] },
                { "name": "Minhas Linhas", "items": ["OLD11"] }
            ] } }),
        )
        .with(
            VIEW_SELECTION_KEY,
            json!({ "assetClass": "br_reits", "rowViewNames": { "br_reits": ["Logística"] } }),
        );

    let migrated = migrate_blob(blob).unwrap();

    assert_eq!(
        migrated.get(VIEWS_AVAILABLE_KEY).unwrap(),
        &json!({
            "br_reits": { "rowViews": [
                { "name": "Logística", "items": ["BTLG11"] },
                { "name": "Minhas Linhas", "items": ["HGLG11"] }
            ] },
            "us_stocks": { "colViews": [
                { "name": "Minhas Colunas", "items": [
                    { "group": "Quote", "keys": ["yahoo.quote.price"] }
                ] }
            ] }
        })
    );
    assert_eq!(
        migrated.get(VIEW_SELECTION_KEY).unwrap(),
        &json!({
            "assetClass": "br_reits",
            "rowViewNames": { "br_reits": ["Minhas Linhas"] },
            "colViewNames": { "us_stocks": ["Minhas Colunas"] }
        })
    );
    assert!(!migrated.contains_key(LEGACY_ROWS_KEY));
    assert!(!migrated.contains_key(LEGACY_COLUMNS_KEY));
}
