/// Integer schema version of the persisted configuration
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Named row and column views per asset class
pub const VIEWS_AVAILABLE_KEY: &str = "views_available";

/// Active asset class and selected view names
pub const VIEW_SELECTION_KEY: &str = "view_selection";

/// Imported broker positions per asset class
pub const POSITIONS_KEY: &str = "positions";

pub const THEME_KEY: &str = "theme";

/// Flat row list written by schema version 0
pub const LEGACY_ROWS_KEY: &str = "rows";

/// Flat column list written by schema version 0
pub const LEGACY_COLUMNS_KEY: &str = "columns";

/// Keys the migration pipeline reads and rewrites
pub const MIGRATED_KEYS: [&str; 5] = [
    VIEWS_AVAILABLE_KEY,
    VIEW_SELECTION_KEY,
    POSITIONS_KEY,
    LEGACY_ROWS_KEY,
    LEGACY_COLUMNS_KEY,
];

/// Keys no longer read past schema version 0. A migration removes them even
/// when their value is unreadable.
pub const RETIRED_KEYS: [&str; 2] = [LEGACY_ROWS_KEY, LEGACY_COLUMNS_KEY];
