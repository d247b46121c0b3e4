//! Derived metrics shipped with the dashboard.
//!
//! None of these rules reads another derived key.

use super::{DerivationRegistry, DerivationRule, DerivationRules};
use crate::data::AssetClass;
use crate::errors::Result;
use crate::keys::{
    BAZIN_PRICE, FUNDAMENTALS_DY, FUNDAMENTALS_LPA, FUNDAMENTALS_VPA, GRAHAM_PRICE, GRAHAM_UPSIDE,
    POSITION_AVERAGE_PRICE, POSITION_DIVIDENDS, POSITION_GAIN, POSITION_QUANTITY,
    POSITION_TOTAL_COST, POSITION_TOTAL_VALUE, POSITION_YIELD_ON_COST, QUOTE_PRICE,
};

/// Graham's number constant (15 P/E times 1.5 P/VP)
const GRAHAM_FACTOR: f64 = 22.5;

/// Minimum yield Bazin's method demands
const BAZIN_MIN_YIELD: f64 = 0.06;

/// Rules over an imported broker position, shared by every asset class.
pub fn position_rules() -> Vec<DerivationRule> {
    vec![
        DerivationRule::numeric(
            POSITION_TOTAL_COST,
            &[POSITION_QUANTITY, POSITION_AVERAGE_PRICE],
            |v| v[0] * v[1],
        ),
        DerivationRule::numeric(
            POSITION_TOTAL_VALUE,
            &[POSITION_QUANTITY, QUOTE_PRICE],
            |v| v[0] * v[1],
        ),
        DerivationRule::numeric(
            POSITION_GAIN,
            &[QUOTE_PRICE, POSITION_AVERAGE_PRICE],
            |v| v[0] / v[1] - 1.0,
        ),
        DerivationRule::numeric(
            POSITION_YIELD_ON_COST,
            &[POSITION_DIVIDENDS, POSITION_QUANTITY, POSITION_AVERAGE_PRICE],
            |v| v[0] / (v[1] * v[2]),
        ),
    ]
}

/// Fair-price estimates from fundamentals.
pub fn stock_valuation_rules() -> Vec<DerivationRule> {
    vec![
        DerivationRule::numeric(GRAHAM_PRICE, &[FUNDAMENTALS_LPA, FUNDAMENTALS_VPA], |v| {
            (GRAHAM_FACTOR * v[0] * v[1]).sqrt()
        }),
        DerivationRule::numeric(
            GRAHAM_UPSIDE,
            &[FUNDAMENTALS_LPA, FUNDAMENTALS_VPA, QUOTE_PRICE],
            |v| (GRAHAM_FACTOR * v[0] * v[1]).sqrt() / v[2] - 1.0,
        ),
        bazin_rule(),
    ]
}

// dy is a percentage of the current price
fn bazin_rule() -> DerivationRule {
    DerivationRule::numeric(BAZIN_PRICE, &[FUNDAMENTALS_DY, QUOTE_PRICE], |v| {
        (v[0] / 100.0 * v[1]) / BAZIN_MIN_YIELD
    })
}

/// Registry with the built-in rule set of every asset class.
pub fn default_registry() -> Result<DerivationRegistry> {
    let mut registry = DerivationRegistry::new();

    let mut br_stocks = position_rules();
    br_stocks.extend(stock_valuation_rules());
    registry.register(AssetClass::BrStocks, DerivationRules::new(br_stocks)?);

    let mut br_reits = position_rules();
    br_reits.push(bazin_rule());
    registry.register(AssetClass::BrReits, DerivationRules::new(br_reits)?);

    registry.register(AssetClass::UsStocks, DerivationRules::new(position_rules())?);

    Ok(registry)
}
