//! yfinance-data: the authenticated, caching HTTP layer under a Yahoo Finance client.
//!
//! A [`TickerData`] issues GET requests on behalf of one symbol. It makes sure a crumb is
//! attached to each request (fetching cookie and crumb on first use), memoizes identical
//! requests in a bounded LRU cache, and can decode JSON bodies.

pub mod core;
mod ticker;

pub use crate::core::client::{
    CacheKey, CacheStats, ConsentForm, CrumbState, CrumbStrategy, ProxyConfig, ProxySetting,
    RequestOptions, Session, extract_consent_form, normalize_proxy,
};
pub use crate::core::transport::{BoxFuture, GetRequest, PostRequest};
pub use crate::core::{Cookie, HttpResponse, ReqwestTransport, Transport, YfClient, YfClientBuilder, YfError};
pub use ticker::TickerData;

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG` (default `yfinance_data=debug`).
///
/// Intended for tests and ad-hoc debugging; does nothing if a global subscriber is already set.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("yfinance_data=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
