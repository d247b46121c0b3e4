use log::debug;
use std::collections::{BTreeSet, HashMap, VecDeque};

use super::DerivationRule;
use crate::data::{DataEntry, DataSet};
use crate::errors::DerivationError;
use crate::keys::is_valid_metric_key;

/// A validated rule set, stored in evaluation order.
///
/// Rules may take other derived keys as arguments; construction orders them
/// so dependencies are evaluated first and rejects cycles.
#[derive(Debug, Clone, Default)]
pub struct DerivationRules {
    ordered: Vec<DerivationRule>,
}

impl DerivationRules {
    pub fn new(rules: Vec<DerivationRule>) -> Result<Self, DerivationError> {
        let mut index_by_key: HashMap<&str, usize> = HashMap::with_capacity(rules.len());
        for (idx, rule) in rules.iter().enumerate() {
            if !is_valid_metric_key(&rule.key) {
                return Err(DerivationError::InvalidKey(rule.key.clone()));
            }
            if rule.arguments.iter().any(|arg| arg == &rule.key) {
                return Err(DerivationError::SelfReference(rule.key.clone()));
            }
            if index_by_key.insert(rule.key.as_str(), idx).is_some() {
                return Err(DerivationError::DuplicateKey(rule.key.clone()));
            }
        }

        // dependencies[i]: indexes of rules whose output rule i reads
        let dependencies: Vec<Vec<usize>> = rules
            .iter()
            .map(|rule| {
                rule.arguments
                    .iter()
                    .filter_map(|arg| index_by_key.get(arg.as_str()).copied())
                    .collect()
            })
            .collect();

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); rules.len()];
        let mut pending: Vec<usize> = vec![0; rules.len()];
        for (idx, deps) in dependencies.iter().enumerate() {
            pending[idx] = deps.len();
            for &dep in deps {
                dependents[dep].push(idx);
            }
        }

        let mut ready: VecDeque<usize> = (0..rules.len()).filter(|&i| pending[i] == 0).collect();
        let mut order: Vec<usize> = Vec::with_capacity(rules.len());
        while let Some(idx) = ready.pop_front() {
            order.push(idx);
            for &dependent in &dependents[idx] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() < rules.len() {
            let cycle = find_cycle(&rules, &dependencies, &pending);
            return Err(DerivationError::Cycle(cycle));
        }

        let mut slots: Vec<Option<DerivationRule>> = rules.into_iter().map(Some).collect();
        let ordered = order
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect();

        Ok(DerivationRules { ordered })
    }

    pub fn rules(&self) -> &[DerivationRule] {
        &self.ordered
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn derived_keys(&self) -> BTreeSet<&str> {
        self.ordered.iter().map(|rule| rule.key.as_str()).collect()
    }

    /// Recomputes every derived field of one entity from scratch.
    ///
    /// Stale derived values from a previous cycle are dropped first, so a
    /// derived key whose arguments went missing disappears.
    pub fn derive_entry(&self, entry: &DataEntry) -> DataEntry {
        let mut derived = entry.clone();
        for rule in &self.ordered {
            derived.remove(&rule.key);
        }
        for rule in &self.ordered {
            if let Some(value) = rule.evaluate(&derived) {
                derived.insert(rule.key.clone(), value);
            }
        }
        derived
    }

    pub fn derive_all(&self, data_set: &DataSet) -> DataSet {
        debug!(
            "Deriving {} rules over {} entities",
            self.ordered.len(),
            data_set.len()
        );
        data_set
            .iter()
            .map(|(ticker, entry)| (ticker.clone(), self.derive_entry(entry)))
            .collect()
    }
}

/// Walks dependency edges among the rules left unresolved by the
/// topological sort. Each of them still has an unresolved dependency, so the
/// walk must revisit a node.
fn find_cycle(rules: &[DerivationRule], dependencies: &[Vec<usize>], pending: &[usize]) -> Vec<String> {
    let unresolved = |idx: usize| pending[idx] > 0;
    let Some(start) = (0..rules.len()).find(|&idx| unresolved(idx)) else {
        return Vec::new();
    };

    let mut path: Vec<usize> = Vec::new();
    let mut current = start;
    loop {
        if let Some(pos) = path.iter().position(|&idx| idx == current) {
            let mut cycle: Vec<String> = path[pos..]
                .iter()
                .map(|&idx| rules[idx].key.clone())
                .collect();
            cycle.push(rules[current].key.clone());
            return cycle;
        }
        path.push(current);
        match dependencies[current].iter().copied().find(|&dep| unresolved(dep)) {
            Some(next) => current = next,
            None => return path.into_iter().map(|idx| rules[idx].key.clone()).collect(),
        }
    }
}
