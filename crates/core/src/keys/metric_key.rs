use super::{KEY_SEPARATOR, TICKER_KEY};

/// Splits a metric key on its last separator into `(prefix, suffix)`.
///
/// The split happens on the *last* separator so that nested keys such as
/// `yahoo.derived.chart.1mo` belong to their immediate parent group
/// (`yahoo.derived.chart`) rather than to their root. A key without a
/// separator has an empty prefix.
pub fn split_key(key: &str) -> (&str, &str) {
    match key.rfind(KEY_SEPARATOR) {
        Some(idx) => (&key[..idx], &key[idx + KEY_SEPARATOR.len_utf8()..]),
        None => ("", key),
    }
}

/// All segments but the last. Empty for `ticker`.
pub fn get_prefix(key: &str) -> &str {
    split_key(key).0
}

/// The last segment.
pub fn get_suffix(key: &str) -> &str {
    split_key(key).1
}

/// Returns true when `key` is `prefix` itself or lives under it.
///
/// Matching is on segment boundaries: `b3_position` covers
/// `b3_position.quantity` but not `b3_positions.quantity`.
pub fn key_has_prefix(key: &str, prefix: &str) -> bool {
    match key.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(KEY_SEPARATOR),
        None => false,
    }
}

/// A metric key is well formed when it has no empty segments and carries a
/// non-empty prefix. The reserved `ticker` key is the only prefix-less key.
pub fn is_valid_metric_key(key: &str) -> bool {
    if key == TICKER_KEY {
        return true;
    }
    let (prefix, suffix) = split_key(key);
    !prefix.is_empty()
        && !suffix.is_empty()
        && prefix.split(KEY_SEPARATOR).all(|segment| !segment.is_empty())
}
