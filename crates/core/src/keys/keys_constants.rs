/// Separator between metric key segments
pub const KEY_SEPARATOR: char = '.';

/// Reserved key holding the entity identifier itself
pub const TICKER_KEY: &str = "ticker";

// Imported broker positions
pub const POSITION_QUANTITY: &str = "b3.position.quantity";
pub const POSITION_AVERAGE_PRICE: &str = "b3.position.average_price";
pub const POSITION_DIVIDENDS: &str = "b3.position.dividends";

// Derived position metrics
pub const POSITION_TOTAL_COST: &str = "b3.derived.position.total_cost";
pub const POSITION_TOTAL_VALUE: &str = "b3.derived.position.total_value";
pub const POSITION_GAIN: &str = "b3.derived.position.gain";
pub const POSITION_YIELD_ON_COST: &str = "b3.derived.position.yield_on_cost";

// Quotes
pub const QUOTE_PRICE: &str = "yahoo.quote.price";

// Fundamentals
pub const FUNDAMENTALS_LPA: &str = "statusinvest.lpa";
pub const FUNDAMENTALS_VPA: &str = "statusinvest.vpa";
pub const FUNDAMENTALS_DY: &str = "statusinvest.dy";
pub const FUNDAMENTALS_P_VP: &str = "statusinvest.p_vp";
pub const GRAHAM_PRICE: &str = "statusinvest.derived.graham_price";
pub const GRAHAM_UPSIDE: &str = "statusinvest.derived.graham_upside";
pub const BAZIN_PRICE: &str = "statusinvest.derived.bazin_price";
