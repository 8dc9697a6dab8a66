//! Product-level fallbacks and feed bounds.
//!
//! The target defaults are a product decision, not a database default: they
//! apply whenever a target row, or a single slot within it, is absent.

/// Per-slot visit target used when an officer has no configured target.
pub const DEFAULT_VISIT_TARGET: i32 = 25;

/// Overall farm target used when an officer has no target row.
pub const DEFAULT_TOTAL_FARM_TARGET: i32 = 25;

/// Display fallbacks for missing relationship data.
pub const UNKNOWN_OFFICER: &str = "Unknown Officer";
pub const UNKNOWN_REGION: &str = "Unknown Region";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_INITIALS: &str = "UO";

/// An officer counts as "active" when they submitted within this window.
pub const ACTIVE_OFFICER_WINDOW_DAYS: i64 = 7;

/// A most-recent submission older than this is reported as a sync error,
/// regardless of its workflow status.
pub const STALE_SYNC_HOURS: i64 = 24;

pub const RECENT_ACTIVITY_LIMIT: i64 = 10;
pub const SYNC_STATUS_LIMIT: usize = 8;
pub const GEOGRAPHIC_FEED_LIMIT: i64 = 8;
pub const ADMIN_LIST_LIMIT: i64 = 50;

pub const METRICS_QUERY_TIMEOUT_SECS: u64 = 15;
