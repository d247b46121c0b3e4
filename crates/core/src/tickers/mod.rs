//! Tickers module - entity identity across corporate renames and relistings.

mod ticker_renames;


pub use ticker_renames::{FoldStrategy, TickerRenames, POSITION_FOLD, TICKER_RENAME_TABLE};
