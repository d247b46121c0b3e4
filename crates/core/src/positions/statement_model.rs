use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// One row of a B3 "movimentação" statement as produced by the spreadsheet
/// parser. Cells may arrive as numbers or as Brazilian-formatted text.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementRow {
    #[serde(rename = "Entrada/Saída")]
    pub direction: String,
    #[serde(rename = "Data")]
    pub date: String,
    #[serde(rename = "Movimentação")]
    pub movement: String,
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Quantidade", default)]
    pub quantity: Value,
    #[serde(rename = "Preço unitário", default)]
    pub unit_price: Value,
    #[serde(rename = "Valor da Operação", default)]
    pub amount: Value,
}

/// What a statement row means for a position.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementEvent {
    Buy { quantity: Decimal, unit_price: Decimal },
    Sell { quantity: Decimal },
    Income { amount: Decimal },
    Split { quantity: Decimal },
}

const CREDIT: &str = "credito";
const DEBIT: &str = "debito";

const TRADE_MOVEMENTS: [&str; 3] = ["transferência - liquidação", "compra", "venda"];
const INCOME_MOVEMENTS: [&str; 3] = ["dividendo", "juros sobre capital próprio", "rendimento"];
const SPLIT_MOVEMENTS: [&str; 1] = ["desdobramento"];

// B3 writes "Credito"/"Debito", older exports carry the accents
fn normalize_direction(direction: &str) -> String {
    direction
        .trim()
        .to_lowercase()
        .replace('é', "e")
        .replace('á', "a")
}

impl StatementRow {
    pub fn parse_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%d/%m/%Y").ok()
    }

    /// Ticker from a product cell such as `PETR4 - PETROLEO BRASILEIRO S.A.`
    pub fn ticker(&self) -> Option<&str> {
        let ticker = self.product.split(" - ").next()?.trim();
        (!ticker.is_empty()).then_some(ticker)
    }

    /// Classifies the row. Rows that do not affect positions (transfers of
    /// custody, lending, fractional auctions...) yield `None`.
    pub fn event(&self) -> Option<StatementEvent> {
        let direction = normalize_direction(&self.direction);
        let movement = self.movement.trim().to_lowercase();
        let quantity = parse_decimal(&self.quantity);

        if TRADE_MOVEMENTS.contains(&movement.as_str()) {
            let quantity = quantity.filter(|q| q.is_sign_positive() && !q.is_zero())?;
            return match direction.as_str() {
                CREDIT => {
                    let unit_price = parse_decimal(&self.unit_price).or_else(|| {
                        parse_decimal(&self.amount)
                            .and_then(|amount| amount.checked_div(quantity))
                    })?;
                    Some(StatementEvent::Buy {
                        quantity,
                        unit_price,
                    })
                }
                DEBIT => Some(StatementEvent::Sell { quantity }),
                _ => None,
            };
        }

        if INCOME_MOVEMENTS.contains(&movement.as_str()) && direction == CREDIT {
            let amount = parse_decimal(&self.amount)?;
            return Some(StatementEvent::Income { amount });
        }

        if SPLIT_MOVEMENTS.contains(&movement.as_str()) && direction == CREDIT {
            return quantity.map(|quantity| StatementEvent::Split { quantity });
        }

        None
    }
}

/// Parses a cell into a decimal. Text cells accept `R$` prefixes and the
/// Brazilian `1.234,56` format; `-` and empty cells are no value.
pub fn parse_decimal(cell: &Value) -> Option<Decimal> {
    match cell {
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        Value::String(s) => {
            let cleaned = s.trim().trim_start_matches("R$").trim();
            if cleaned.is_empty() || cleaned == "-" {
                return None;
            }
            let normalized = if cleaned.contains(',') {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.to_string()
            };
            Decimal::from_str(&normalized).ok()
        }
        _ => None,
    }
}

/// Deserializes raw spreadsheet rows, skipping the ones that lack the
/// expected columns.
pub fn parse_rows(raw_rows: &[Value]) -> Vec<StatementRow> {
    raw_rows
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| match StatementRow::deserialize(raw) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("Skipping statement row {}: {}", idx, e);
                None
            }
        })
        .collect()
}
