//! Groups module - classification of metric key prefixes into logical groups.

mod group_index;
mod group_patterns;

#[cfg(test)]
mod group_index_tests;

pub use group_index::{classify, GroupIndex};
pub use group_patterns::{default_group_patterns, GroupPattern, GroupPatterns, WILDCARD};
