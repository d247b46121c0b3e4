use log::{debug, warn};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{StatementEvent, StatementRow};
use crate::constants::{DECIMAL_PRECISION, QUANTITY_THRESHOLD};
use crate::data::{DataEntry, DataSet, MetricValue};
use crate::keys::{POSITION_AVERAGE_PRICE, POSITION_DIVIDENDS, POSITION_QUANTITY};
use crate::tickers::TickerRenames;

/// Running state of one ticker while a statement is replayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionState {
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub dividends: Decimal,
}

impl PositionState {
    /// Weighted-average cost over the existing and the bought quantity.
    /// Returns `None`, leaving the state untouched, on decimal overflow.
    pub fn buy(&mut self, quantity: Decimal, unit_price: Decimal) -> Option<()> {
        let new_quantity = self.quantity.checked_add(quantity)?;
        if new_quantity.is_zero() {
            return Some(());
        }
        let total_cost = self
            .quantity
            .checked_mul(self.average_price)?
            .checked_add(quantity.checked_mul(unit_price)?)?;
        self.average_price = total_cost.checked_div(new_quantity)?;
        self.quantity = new_quantity;
        Some(())
    }

    /// Sells leave the average cost untouched.
    pub fn sell(&mut self, quantity: Decimal) -> Option<()> {
        self.quantity = self.quantity.checked_sub(quantity)?;
        Some(())
    }

    /// More shares for the same total cost.
    pub fn split(&mut self, quantity: Decimal) -> Option<()> {
        let new_quantity = self.quantity.checked_add(quantity)?;
        if new_quantity.is_zero() {
            return Some(());
        }
        let total_cost = self.quantity.checked_mul(self.average_price)?;
        self.average_price = total_cost.checked_div(new_quantity)?;
        self.quantity = new_quantity;
        Some(())
    }

    pub fn receive(&mut self, amount: Decimal) -> Option<()> {
        self.dividends = self.dividends.checked_add(amount)?;
        Some(())
    }

    pub fn is_open(&self) -> bool {
        self.quantity > QUANTITY_THRESHOLD
    }

    fn to_entry(&self) -> DataEntry {
        let mut entry = DataEntry::new();
        let fields = [
            (POSITION_QUANTITY, self.quantity),
            (POSITION_AVERAGE_PRICE, self.average_price),
            (POSITION_DIVIDENDS, self.dividends),
        ];
        for (key, value) in fields {
            if let Some(number) = value.round_dp(DECIMAL_PRECISION).to_f64() {
                entry.insert(key.to_string(), MetricValue::Number(number));
            }
        }
        entry
    }
}

/// Replays statement rows in chronological order into one position per
/// ticker.
///
/// Tickers are resolved through `renames` before anything is accumulated,
/// so history recorded under a prior ticker lands on the current one. A
/// ticker whose quantity reaches zero is removed entirely.
pub fn extract_positions(rows: &[StatementRow], renames: &TickerRenames) -> DataSet {
    let mut dated: Vec<_> = rows
        .iter()
        .filter_map(|row| match (row.parse_date(), row.ticker()) {
            (Some(date), Some(ticker)) => Some((date, ticker, row)),
            _ => {
                warn!(
                    "Skipping statement row without a valid date or product: {:?}",
                    row
                );
                None
            }
        })
        .collect();
    // stable: same-day rows keep statement order
    dated.sort_by_key(|(date, _, _)| *date);

    let mut states: BTreeMap<String, PositionState> = BTreeMap::new();
    for (date, ticker, row) in dated {
        let Some(event) = row.event() else {
            debug!("Ignoring '{}' for {} on {}", row.movement, ticker, date);
            continue;
        };
        let ticker = renames.resolve(ticker).to_string();

        let is_sell = matches!(event, StatementEvent::Sell { .. });
        if !states.contains_key(&ticker) {
            match event {
                StatementEvent::Sell { .. } => {
                    warn!("Sell of {} on {} without a prior position", ticker, date);
                    continue;
                }
                StatementEvent::Split { .. } => continue,
                _ => {}
            }
        }

        // applied to a copy so an overflowing row leaves no trace
        let mut state = states.get(&ticker).cloned().unwrap_or_default();
        let applied = match event {
            StatementEvent::Buy {
                quantity,
                unit_price,
            } => state.buy(quantity, unit_price),
            StatementEvent::Sell { quantity } => state.sell(quantity),
            StatementEvent::Split { quantity } => state.split(quantity),
            StatementEvent::Income { amount } => state.receive(amount),
        };
        if applied.is_none() {
            warn!(
                "Skipping '{}' for {} on {}: amounts out of range",
                row.movement, ticker, date
            );
            continue;
        }

        if is_sell && !state.is_open() {
            debug!("Position in {} closed on {}", ticker, date);
            states.remove(&ticker);
        } else {
            states.insert(ticker, state);
        }
    }

    states
        .into_iter()
        .filter(|(_, state)| state.is_open())
        .map(|(ticker, state)| (ticker, state.to_entry()))
        .collect()
}
