//! Positions module - turns broker statement rows into `b3.position.*`
//! records.

mod positions_extractor;
mod statement_model;


pub use positions_extractor::{extract_positions, PositionState};
pub use statement_model::{parse_decimal, parse_rows, StatementEvent, StatementRow};
