//! Shared cache-control policies for HTTP handlers.

/// Owner-only data must always be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Probes and exports are never stored.
pub const NO_STORE: &str = "no-store";

/// Header tuple for responses carrying a user's private data.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

/// Header tuple for responses that must not be cached at all.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
