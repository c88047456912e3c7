//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for
//! env-var-based configuration. They should rarely change; see
//! [`Config`](crate::config::Config) for the runtime-tunable knobs.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Storage ---

/// Default SQLite database, created next to the binary when DATABASE_URL is
/// absent.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://wayplan.db?mode=rwc";

// --- Search defaults ---

/// Default POI search radius in meters. Overridden by `SEARCH_RADIUS_M`.
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 10_000.0;
/// Maximum results requested from the search provider per query.
pub const SEARCH_RESULT_LIMIT: u32 = 10;

// --- Directions defaults ---

/// Per-segment directions request timeout in seconds. A timed-out segment is
/// treated exactly like a provider error: the leg keeps zero cost and the
/// remaining segments are still resolved. Overridden by `SEGMENT_TIMEOUT_SECS`.
pub const DEFAULT_SEGMENT_TIMEOUT_SECS: u64 = 10;

// --- In-memory cache defaults ---

/// Default resolved-segment cache TTL: 1 hour. Overridden by
/// `SEGMENT_CACHE_TTL`.
pub const DEFAULT_SEGMENT_CACHE_TTL_SECONDS: u64 = 3_600;
/// Maximum entries for the in-memory segment cache (LRU eviction).
pub const DEFAULT_SEGMENT_CACHE_MAX_ENTRIES: u64 = 1_000;

// --- Route persistence ---

/// Name given to a route saved without one.
pub const UNTITLED_ROUTE_NAME: &str = "Untitled Route";
