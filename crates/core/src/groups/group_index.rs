use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use super::GroupPatterns;
use crate::keys::get_prefix;
use crate::metadata::AssetClassMetadata;

/// Maps each prefix to its group. Prefixes that match nothing are left out;
/// consumers label them with the prefix itself.
pub fn classify<'a>(
    prefixes: impl IntoIterator<Item = &'a str>,
    patterns: &GroupPatterns,
) -> BTreeMap<String, String> {
    prefixes
        .into_iter()
        .filter_map(|prefix| {
            patterns
                .group_of(prefix)
                .map(|group| (prefix.to_string(), group.to_string()))
        })
        .collect()
}

/// Prefix -> group and group -> prefixes over the keys of one asset class.
///
/// Derived from the current key universe; rebuild it whenever the schema
/// changes instead of persisting it.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    group_by_prefix: BTreeMap<String, String>,
    prefixes_by_group: BTreeMap<String, Vec<String>>,
    group_order: Vec<String>,
    unclassified: Vec<String>,
    keys_by_prefix: BTreeMap<String, Vec<String>>,
    labels: BTreeMap<String, String>,
}

impl GroupIndex {
    pub fn build<S: AsRef<str>>(keys: &[S], patterns: &GroupPatterns) -> Self {
        let mut keys_by_prefix: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for key in keys {
            let key = key.as_ref();
            let prefix = get_prefix(key);
            if prefix.is_empty() {
                continue;
            }
            keys_by_prefix
                .entry(prefix.to_string())
                .or_default()
                .push(key.to_string());
        }

        let group_by_prefix = classify(keys_by_prefix.keys().map(String::as_str), patterns);

        let mut prefixes_by_group: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (prefix, group) in &group_by_prefix {
            prefixes_by_group
                .entry(group.clone())
                .or_default()
                .push(prefix.clone());
        }

        let group_order = patterns
            .groups()
            .map(|(group, _)| group.to_string())
            .filter(|group| prefixes_by_group.contains_key(group))
            .collect();

        let unclassified = keys_by_prefix
            .keys()
            .filter(|prefix| !group_by_prefix.contains_key(*prefix))
            .cloned()
            .collect::<Vec<_>>();

        debug!(
            "Built group index: {} prefixes, {} groups, {} unclassified",
            keys_by_prefix.len(),
            prefixes_by_group.len(),
            unclassified.len()
        );

        GroupIndex {
            group_by_prefix,
            prefixes_by_group,
            group_order,
            unclassified,
            keys_by_prefix,
            labels: BTreeMap::new(),
        }
    }

    /// Index over an asset class's schema, with its labels available to
    /// search.
    pub fn from_metadata(metadata: &AssetClassMetadata, patterns: &GroupPatterns) -> Self {
        let mut index = Self::build(&metadata.schema, patterns);
        index.labels = metadata.labels.clone();
        index
    }

    pub fn group_by_prefix(&self) -> &BTreeMap<String, String> {
        &self.group_by_prefix
    }

    pub fn prefixes_by_group(&self) -> &BTreeMap<String, Vec<String>> {
        &self.prefixes_by_group
    }

    /// Group label for `prefix`, falling back to the prefix itself.
    pub fn group_label<'a>(&'a self, prefix: &'a str) -> &'a str {
        self.group_by_prefix
            .get(prefix)
            .map(String::as_str)
            .unwrap_or(prefix)
    }

    /// Groups in declaration order, then unclassified prefixes as their own
    /// single-prefix groups.
    pub fn groups(&self) -> Vec<(String, Vec<String>)> {
        let mut groups: Vec<(String, Vec<String>)> = self
            .group_order
            .iter()
            .map(|group| {
                let prefixes = self.prefixes_by_group.get(group).cloned().unwrap_or_default();
                (group.clone(), prefixes)
            })
            .collect();
        groups.extend(
            self.unclassified
                .iter()
                .map(|prefix| (prefix.clone(), vec![prefix.clone()])),
        );
        groups
    }

    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }

    /// Every key whose group, key or label contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut found: BTreeSet<String> = BTreeSet::new();
        for (prefix, keys) in &self.keys_by_prefix {
            let group_hit = self.group_label(prefix).to_lowercase().contains(&needle);
            for key in keys {
                let label_hit = self
                    .labels
                    .get(key)
                    .or_else(|| self.labels.get(prefix))
                    .is_some_and(|label| label.to_lowercase().contains(&needle));
                if group_hit || label_hit || key.to_lowercase().contains(&needle) {
                    found.insert(key.clone());
                }
            }
        }
        found.into_iter().collect()
    }
}
