use crate::core::client::{CacheKey, RequestOptions, normalize_proxy};
use crate::core::transport::{GetRequest, HttpResponse};
use crate::core::{YfClient, YfError};
use serde::de::DeserializeOwned;
use url::Url;

/// Crumb-authenticated, memoizing access to Yahoo endpoints on behalf of one symbol.
///
/// Every request carries a `crumb` query parameter. If the caller does not pass one, the
/// client's session crumb is used, fetched on first use.
///
/// # Example
///
/// ```no_run
/// # use yfinance_data::{RequestOptions, TickerData, YfClient};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = YfClient::default();
/// let data = TickerData::new(&client, "AAPL");
///
/// let summary: serde_json::Value = data
///     .get_json(
///         "https://query2.finance.yahoo.com/v10/finance/quoteSummary/AAPL",
///         RequestOptions::new().param("modules", "price"),
///     )
///     .await?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TickerData {
    client: YfClient,
    symbol: String,
}

impl TickerData {
    /// Creates a `TickerData` sharing `client`'s session, cache and transport.
    pub fn new(client: &YfClient, symbol: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            symbol: symbol.into(),
        }
    }

    /// The symbol this handle was created for.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The client whose session, cache and transport this handle uses.
    pub const fn client(&self) -> &YfClient {
        &self.client
    }

    /// Issues a GET with the crumb attached and returns the raw response.
    ///
    /// The status code is not checked.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Url` for an unparsable `url`, `YfError::Auth` if a crumb was needed
    /// and could not be obtained, or the transport's error.
    #[tracing::instrument(skip(self, opts), err, fields(symbol = %self.symbol))]
    pub async fn get(&self, url: &str, opts: RequestOptions) -> Result<HttpResponse, YfError> {
        tracing::debug!("get(): {url}");
        let url = Url::parse(url)?;
        let proxy = normalize_proxy(opts.proxy.as_ref());
        let timeout = opts.timeout.unwrap_or(self.client.timeout());

        let needs_crumb = !opts.has_param("crumb");
        let mut params = opts.params;
        if needs_crumb {
            let crumb = self.client.ensure_crumb(proxy.as_ref(), timeout).await?;
            params.push(("crumb".into(), crumb));
        }

        let req = GetRequest {
            url,
            headers: self.client.headers_with_agent(&opts.headers),
            params,
            cookies: opts.cookies,
            proxy,
            timeout,
        };
        self.client.transport().get(req).await
    }

    /// Same as [`get`](Self::get), but identical requests are answered from the client's
    /// LRU cache. Only successful transport calls are cached, whatever their status.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), on a cache miss.
    #[tracing::instrument(skip(self, opts), err, fields(symbol = %self.symbol))]
    pub async fn get_cached(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<HttpResponse, YfError> {
        let key = CacheKey::new(url, &opts, self.client.timeout());
        if let Some(resp) = self.client.cache().get(&key).await {
            tracing::debug!("cache hit: {url}");
            return Ok(resp);
        }

        tracing::debug!("cache miss: {url}");
        let resp = self.get(url, opts).await?;
        self.client.cache().put(key, resp.clone()).await;
        Ok(resp)
    }

    /// Issues a GET and parses the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Status` for a non-2xx response (before any parsing),
    /// `YfError::Json` for an unparsable body, or any error of [`get`](Self::get).
    #[tracing::instrument(skip(self, opts), err, fields(symbol = %self.symbol))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<T, YfError> {
        let resp = self.get(url, opts).await?.error_for_status()?;
        resp.json()
    }

    /// [`get_json`](Self::get_json) into an untyped `serde_json::Value`.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    pub async fn get_raw_json(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<serde_json::Value, YfError> {
        self.get_json(url, opts).await
    }
}
