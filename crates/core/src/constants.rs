use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Schema version of the persisted configuration understood by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Name of the row view synthesized from legacy flat row lists
pub const LEGACY_ROW_VIEW_NAME: &str = "Minhas Linhas";

/// Name of the column view synthesized from legacy flat column lists
pub const LEGACY_COLUMN_VIEW_NAME: &str = "Minhas Colunas";

/// Name of the system-provided default view for every asset class
pub const DEFAULT_VIEW_NAME: &str = "Padrão";

/// Quantity at or below which an imported position is considered closed
pub const QUANTITY_THRESHOLD: Decimal = dec!(0.00000001);

/// Upper bound on rename hops followed when resolving a ticker
pub const MAX_RENAME_HOPS: usize = 16;

/// Decimal places kept on extracted average prices and amounts
pub const DECIMAL_PRECISION: u32 = 6;
