//! Public client surface + builder.
//! Internals are split into `auth` (cookie/crumb), `session` (shared credential state),
//! `consent` (consent page scraping), `cache` (memoized GETs), `proxy`, `request`
//! (per-call options) and `constants` (UA + defaults).

mod auth;
mod cache;
mod consent;
mod constants;
mod proxy;
mod request;
mod session;

pub use auth::CrumbStrategy;
pub use cache::{CacheKey, CacheStats};
pub use consent::{ConsentForm, extract_consent_form};
pub use proxy::{ProxyConfig, ProxySetting, normalize_proxy};
pub use request::RequestOptions;
pub use session::{CrumbState, Session};

use crate::core::YfError;
use crate::core::transport::{ReqwestTransport, Transport};
use cache::ResponseCache;
use constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_COLLECT_CONSENT_URL, DEFAULT_CONSENT_CRUMB_URL,
    DEFAULT_CONSENT_URL, DEFAULT_COOKIE_URL, DEFAULT_COPY_CONSENT_URL, DEFAULT_CRUMB_URL,
    DEFAULT_TIMEOUT, USER_AGENT,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Holds the transport, the shared [`Session`], the response cache and the endpoint set.
///
/// Cloning is cheap; clones share credentials and cache.
#[derive(Clone)]
pub struct YfClient {
    transport: Arc<dyn Transport>,
    session: Session,
    cache: Arc<ResponseCache>,

    cookie_url: Url,
    crumb_url: Url,
    consent_url: Url,
    collect_consent_url: Url,
    copy_consent_url: Url,
    consent_crumb_url: Url,

    user_agent: String,
    timeout: Duration,
    crumb_strategy: CrumbStrategy,
}

impl fmt::Debug for YfClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YfClient")
            .field("session", &self.session)
            .field("cookie_url", &self.cookie_url.as_str())
            .field("crumb_url", &self.crumb_url.as_str())
            .field("consent_url", &self.consent_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("crumb_strategy", &self.crumb_strategy)
            .finish_non_exhaustive()
    }
}

impl Default for YfClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl YfClient {
    /// Create a new builder.
    pub fn builder() -> YfClientBuilder {
        YfClientBuilder::default()
    }

    /// The credential state shared by this client and its clones.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// How this client fetches a missing crumb.
    pub const fn crumb_strategy(&self) -> CrumbStrategy {
        self.crumb_strategy
    }

    /// Hit/miss counters and occupancy of the response cache.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drops every memoized response and resets the counters.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub(crate) const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn default_headers(&self) -> Vec<(String, String)> {
        vec![("User-Agent".into(), self.user_agent.clone())]
    }

    /// Caller headers, plus the client UA unless the caller set one.
    pub(crate) fn headers_with_agent(&self, headers: &[(String, String)]) -> Vec<(String, String)> {
        let mut out = headers.to_vec();
        if !out.iter().any(|(k, _)| k.eq_ignore_ascii_case("user-agent")) {
            out.push(("User-Agent".into(), self.user_agent.clone()));
        }
        out
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct YfClientBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    cache_capacity: Option<usize>,
    crumb_strategy: Option<CrumbStrategy>,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Session>,

    cookie_url: Option<Url>,
    crumb_url: Option<Url>,
    consent_url: Option<Url>,
    collect_consent_url: Option<Url>,
    copy_consent_url: Option<Url>,
    consent_crumb_url: Option<Url>,
}

impl YfClientBuilder {
    /// Override the User-Agent sent when the caller does not provide one.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Per-request timeout used when a call does not set one. Default: 30 seconds.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Maximum number of memoized GET responses. Default: 64. `0` disables memoization.
    #[must_use]
    pub const fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Choose how a missing crumb is fetched. Default: [`CrumbStrategy::Consent`].
    #[must_use]
    pub const fn crumb_strategy(mut self, strategy: CrumbStrategy) -> Self {
        self.crumb_strategy = Some(strategy);
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Same as [`transport`](Self::transport) for a transport that is already shared.
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share credentials with another client, or start pre-authenticated.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Override the cookie bootstrap URL.
    #[must_use]
    pub fn cookie_url(mut self, url: Url) -> Self {
        self.cookie_url = Some(url);
        self
    }

    /// Override the crumb URL used by [`CrumbStrategy::Direct`].
    #[must_use]
    pub fn crumb_url(mut self, url: Url) -> Self {
        self.crumb_url = Some(url);
        self
    }

    /// Override the consent page URL.
    #[must_use]
    pub fn consent_url(mut self, url: Url) -> Self {
        self.consent_url = Some(url);
        self
    }

    /// Override the consent form target.
    #[must_use]
    pub fn collect_consent_url(mut self, url: Url) -> Self {
        self.collect_consent_url = Some(url);
        self
    }

    /// Override the consent confirmation URL.
    #[must_use]
    pub fn copy_consent_url(mut self, url: Url) -> Self {
        self.copy_consent_url = Some(url);
        self
    }

    /// Override the crumb URL used by [`CrumbStrategy::Consent`].
    #[must_use]
    pub fn consent_crumb_url(mut self, url: Url) -> Self {
        self.consent_crumb_url = Some(url);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Url` if a default endpoint fails to parse.
    pub fn build(self) -> Result<YfClient, YfError> {
        let cookie_url = endpoint(self.cookie_url, DEFAULT_COOKIE_URL)?;
        let crumb_url = endpoint(self.crumb_url, DEFAULT_CRUMB_URL)?;
        let consent_url = endpoint(self.consent_url, DEFAULT_CONSENT_URL)?;
        let collect_consent_url = endpoint(self.collect_consent_url, DEFAULT_COLLECT_CONSENT_URL)?;
        let copy_consent_url = endpoint(self.copy_consent_url, DEFAULT_COPY_CONSENT_URL)?;
        let consent_crumb_url = endpoint(self.consent_crumb_url, DEFAULT_CONSENT_CRUMB_URL)?;

        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_string());
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new(user_agent.clone())) as Arc<dyn Transport>);

        Ok(YfClient {
            transport,
            session: self.session.unwrap_or_default(),
            cache: Arc::new(ResponseCache::new(
                self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
            )),
            cookie_url,
            crumb_url,
            consent_url,
            collect_consent_url,
            copy_consent_url,
            consent_crumb_url,
            user_agent,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            crumb_strategy: self.crumb_strategy.unwrap_or_default(),
        })
    }
}

fn endpoint(url: Option<Url>, default: &str) -> Result<Url, YfError> {
    match url {
        Some(u) => Ok(u),
        None => Ok(Url::parse(default)?),
    }
}
