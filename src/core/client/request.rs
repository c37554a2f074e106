use super::proxy::ProxySetting;
use std::time::Duration;

/// Optional per-call arguments for [`TickerData`](crate::TickerData) fetches.
///
/// Headers, params and cookies keep insertion order. A list-valued parameter is a run of
/// pairs sharing one name, sent as repeated query keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) cookies: Vec<(String, String)>,
    pub(crate) proxy: Option<ProxySetting>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestOptions {
    /// Creates empty options: no extra headers, params or cookies, no proxy, default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request header. A `User-Agent` here replaces the client's default one.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a query parameter.
    ///
    /// Passing `crumb` yourself skips the automatic crumb fetch for this call.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a list-valued query parameter, one pair per value.
    #[must_use]
    pub fn param_list<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params
            .extend(values.into_iter().map(|v| (name.to_string(), v.into())));
        self
    }

    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Routes the request through a proxy.
    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<ProxySetting>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Overrides the client's default per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    pub(crate) fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(k, _)| k == name)
    }
}
