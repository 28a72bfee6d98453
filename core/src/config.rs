//! Process-wide base URL configuration.
//!
//! # Design
//! Deployments point the client at different backends without threading a URL
//! through every call site: the base URL is set once at startup (or taken
//! from the `VARIANT_API_BASE_URL` environment variable) and read thereafter.
//! Clients constructed with an explicit URL bypass this entirely.

use std::sync::OnceLock;

/// Environment variable consulted when no explicit base URL was set.
pub const BASE_URL_ENV: &str = "VARIANT_API_BASE_URL";

/// Fallback when neither `init_base_url` nor the environment provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

static BASE_URL: OnceLock<String> = OnceLock::new();

/// Set the process-wide base URL. Returns `false` if it was already set (by a
/// previous call or a prior read), in which case the stored value wins.
pub fn init_base_url(url: &str) -> bool {
    BASE_URL.set(url.trim_end_matches('/').to_string()).is_ok()
}

/// The process-wide base URL, resolving on first read to the initialized
/// value, the `VARIANT_API_BASE_URL` environment variable, or
/// `http://localhost`, in that order.
pub fn base_url() -> &'static str {
    BASE_URL.get_or_init(|| {
        std::env::var(BASE_URL_ENV)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    })
}
