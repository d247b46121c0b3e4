use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::HashMap;

use crate::constants::MAX_RENAME_HOPS;
use crate::data::{DataEntry, DataSet, MetricValue};
use crate::keys::{POSITION_AVERAGE_PRICE, POSITION_DIVIDENDS, POSITION_QUANTITY};

/// Prior ticker -> current ticker. Append-only: entries are never edited or
/// removed, a later rename of the new ticker gets its own entry.
pub const TICKER_RENAME_TABLE: &[(&str, &str)] = &[
    ("VVAR3", "VIIA3"),
    ("BTOW3", "AMER3"),
    ("BRDT3", "VBBR3"),
    ("VIIA3", "BHIA3"),
];

lazy_static! {
    static ref BUILTIN: TickerRenames = TickerRenames::new(TICKER_RENAME_TABLE);
}

/// How a field recorded under a prior ticker combines with the same field
/// of the current ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldStrategy {
    /// Amounts add up.
    Sum,
    /// Averaged, weighted by the named field (e.g. price by quantity).
    WeightedBy(&'static str),
}

/// Fold rules for imported positions. Fields not listed keep the current
/// ticker's value and are only filled in from the prior ticker.
pub const POSITION_FOLD: &[(&str, FoldStrategy)] = &[
    (POSITION_QUANTITY, FoldStrategy::Sum),
    (
        POSITION_AVERAGE_PRICE,
        FoldStrategy::WeightedBy(POSITION_QUANTITY),
    ),
    (POSITION_DIVIDENDS, FoldStrategy::Sum),
];

#[derive(Debug, Clone, Default)]
pub struct TickerRenames {
    current_by_prior: HashMap<String, String>,
}

impl TickerRenames {
    pub fn new(table: &[(&str, &str)]) -> Self {
        let mut current_by_prior = HashMap::with_capacity(table.len());
        for (prior, current) in table {
            if current_by_prior
                .insert(prior.to_string(), current.to_string())
                .is_some()
            {
                warn!("Ticker {} renamed more than once, keeping the latest entry", prior);
            }
        }
        TickerRenames { current_by_prior }
    }

    pub fn builtin() -> &'static TickerRenames {
        &BUILTIN
    }

    /// Follows renames until reaching a ticker that was never renamed.
    /// A looping table stops after a bounded number of hops.
    pub fn resolve<'a>(&'a self, ticker: &'a str) -> &'a str {
        let mut current = ticker;
        for _ in 0..MAX_RENAME_HOPS {
            match self.current_by_prior.get(current) {
                Some(next) => current = next.as_str(),
                None => return current,
            }
        }
        warn!("Rename chain for {} does not terminate, stopping at {}", ticker, current);
        current
    }

    pub fn is_renamed(&self, ticker: &str) -> bool {
        self.current_by_prior.contains_key(ticker)
    }

    /// Moves every entity recorded under a prior ticker onto its current
    /// ticker, combining fields per `strategies`. Prior tickers disappear
    /// from the result.
    pub fn fold(&self, data_set: &DataSet, strategies: &[(&str, FoldStrategy)]) -> DataSet {
        let mut folded: DataSet = data_set
            .iter()
            .filter(|(ticker, _)| !self.is_renamed(ticker))
            .map(|(ticker, entry)| (ticker.clone(), entry.clone()))
            .collect();

        for (ticker, entry) in data_set.iter().filter(|(ticker, _)| self.is_renamed(ticker)) {
            let current = self.resolve(ticker).to_string();
            debug!("Folding {} into {}", ticker, current);
            let combined = match folded.get(&current) {
                Some(existing) => combine_entries(existing, entry, strategies),
                None => entry.clone(),
            };
            folded.insert(current, combined);
        }
        folded
    }

    pub fn fold_positions(&self, data_set: &DataSet) -> DataSet {
        self.fold(data_set, POSITION_FOLD)
    }
}

fn number(entry: &DataEntry, key: &str) -> Option<f64> {
    entry.get(key).and_then(MetricValue::as_f64)
}

/// Combines the entry of a prior ticker into the current one. Weighted
/// fields read the weights as they were before any summing.
fn combine_entries(
    current: &DataEntry,
    prior: &DataEntry,
    strategies: &[(&str, FoldStrategy)],
) -> DataEntry {
    let mut combined = current.clone();
    for (key, value) in prior {
        if !combined.contains_key(key) {
            combined.insert(key.clone(), value.clone());
        }
    }

    for &(key, strategy) in strategies {
        let (Some(a), Some(b)) = (number(current, key), number(prior, key)) else {
            continue;
        };
        let value = match strategy {
            FoldStrategy::Sum => a + b,
            FoldStrategy::WeightedBy(weight_key) => {
                match (number(current, weight_key), number(prior, weight_key)) {
                    (Some(wa), Some(wb)) if wa + wb != 0.0 => (a * wa + b * wb) / (wa + wb),
                    _ => a,
                }
            }
        };
        combined.insert(key.to_string(), MetricValue::Number(value));
    }
    combined
}
