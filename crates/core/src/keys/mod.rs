//! Key namespace - dotted metric identifiers and their prefix/suffix split.

mod keys_constants;
mod metric_key;


pub use keys_constants::*;
pub use metric_key::{get_prefix, get_suffix, is_valid_metric_key, key_has_prefix, split_key};
