use lazy_static::lazy_static;
use log::warn;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::keys::key_has_prefix;

/// Underscore-style prefixes of schema version 1 and their dotted
/// replacements. Append-only.
pub const KEY_RENAME_TABLE: [(&str, &str); 7] = [
    ("b3_position", "b3.position"),
    ("b3_dividends", "b3.dividends"),
    ("yahoo_quote", "yahoo.quote"),
    ("yahoo_chart", "yahoo.chart"),
    ("derived.b3_position", "b3.derived.position"),
    ("derived.yahoo_chart", "yahoo.derived.chart"),
    ("derived.statusinvest", "statusinvest.derived"),
];

lazy_static! {
    // most specific first; ties keep table order
    static ref RENAMES_BY_SPECIFICITY: Vec<(&'static str, &'static str)> = {
        let mut renames = KEY_RENAME_TABLE.to_vec();
        renames.sort_by_key(|(old, _)| Reverse(old.len()));
        renames
    };
}

/// New name of `key` under the first (longest) matching prefix, or `None`
/// when no rule covers it.
pub fn rename_key(key: &str) -> Option<String> {
    RENAMES_BY_SPECIFICITY
        .iter()
        .find(|(old, _)| key_has_prefix(key, old))
        .map(|(old, new)| format!("{}{}", new, &key[old.len()..]))
}

pub fn rename_metric_key(key: &str) -> String {
    rename_key(key).unwrap_or_else(|| key.to_string())
}

/// Renames every key of an entry. When an old key and its new-style
/// counterpart are both present, the new-style value is kept.
pub fn rename_entry_keys<V>(entry: BTreeMap<String, V>) -> BTreeMap<String, V> {
    let mut renamed = BTreeMap::new();
    let mut legacy = Vec::new();
    for (key, value) in entry {
        match rename_key(&key) {
            Some(new_key) => legacy.push((key, new_key, value)),
            None => {
                renamed.insert(key, value);
            }
        }
    }

    for (old_key, new_key, value) in legacy {
        if renamed.contains_key(&new_key) {
            warn!(
                "Both '{}' and '{}' are present, keeping '{}'",
                old_key, new_key, new_key
            );
            continue;
        }
        renamed.insert(new_key, value);
    }
    renamed
}
