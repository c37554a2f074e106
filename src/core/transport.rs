//! The HTTP seam between the client and the network.
//!
//! [`YfClient`](crate::YfClient) never talks to `reqwest` directly; it goes through a
//! [`Transport`], so tests and embedders can swap the network layer out.

use crate::core::client::ProxyConfig;
use crate::core::error::YfError;
use reqwest::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{COOKIE, HeaderMap};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// A boxed, sendable future as returned by [`Transport`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A name/value cookie pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl Cookie {
    /// Creates a cookie from a name and a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A fully-read HTTP response.
///
/// The body is buffered so the response can be cloned out of the request cache.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    url: Url,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    body: String,
}

impl HttpResponse {
    /// Creates a response with no headers and no cookies.
    pub fn new(status: u16, url: Url, body: impl Into<String>) -> Self {
        Self {
            status,
            url,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: body.into(),
        }
    }

    /// Replaces the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a cookie as if the server had set it.
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// The HTTP status code.
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// The final URL of the request, including the query string that was sent.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers as received.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Cookies set by this response, in the order the server sent them.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// The response body.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Whether the status is in the 2xx range.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Turns a non-2xx response into [`YfError::Status`].
    ///
    /// # Errors
    ///
    /// Returns `YfError::Status` if the status code is not 2xx.
    pub fn error_for_status(self) -> Result<Self, YfError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(YfError::Status {
                status: self.status,
                url: self.url.to_string(),
            })
        }
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Json` if the body does not deserialize into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, YfError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Everything a transport needs to issue one GET.
#[derive(Debug, Clone)]
pub struct GetRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to `url`. Repeated names are sent as repeated keys.
    pub params: Vec<(String, String)>,
    /// Cookies sent explicitly with this request, on top of any cookie jar the transport keeps.
    pub cookies: Vec<(String, String)>,
    pub proxy: Option<ProxyConfig>,
    pub timeout: Duration,
}

/// Everything a transport needs to issue one form-encoded POST.
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub url: Url,
    pub form: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub proxy: Option<ProxyConfig>,
    pub timeout: Duration,
}

/// A request-capable transport.
///
/// Implementations must not inspect the status code: non-2xx responses are returned
/// as `Ok`, only network-level failures are errors.
pub trait Transport: Send + Sync {
    /// Issues a GET request.
    fn get(&self, req: GetRequest) -> BoxFuture<'_, Result<HttpResponse, YfError>>;

    /// Issues a POST request with a form-encoded body.
    fn post(&self, req: PostRequest) -> BoxFuture<'_, Result<HttpResponse, YfError>>;
}

/// The default [`Transport`], backed by `reqwest`.
///
/// All requests share one cookie jar, so cookies picked up during the consent flow are
/// replayed on later requests. `reqwest` fixes the proxy per client, so one client is
/// built lazily for each distinct proxy configuration.
#[derive(Debug)]
pub struct ReqwestTransport {
    jar: Arc<Jar>,
    user_agent: String,
    clients: Mutex<HashMap<Option<ProxyConfig>, Client>>,
}

impl ReqwestTransport {
    /// Creates a transport whose clients send `user_agent` by default.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            user_agent: user_agent.into(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    async fn client_for(&self, proxy: Option<&ProxyConfig>) -> Result<Client, YfError> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&proxy.cloned()) {
            return Ok(client.clone());
        }

        let mut builder = Client::builder()
            .user_agent(self.user_agent.as_str())
            .cookie_provider(self.jar.clone());
        if let Some(p) = proxy {
            builder = builder.proxy(reqwest::Proxy::https(p.https.as_str())?);
        }
        let client = builder.build()?;

        tracing::debug!(proxy = ?proxy, "built http client");
        clients.insert(proxy.cloned(), client.clone());
        Ok(client)
    }

    /// Jar cookies for `url` plus `explicit` ones, which win on a name clash.
    ///
    /// `reqwest` skips the jar entirely once a request carries its own `Cookie` header,
    /// so the two sets have to be joined here.
    fn merged_cookies(&self, url: &Url, explicit: &[(String, String)]) -> String {
        let jar = self.jar.cookies(url);
        let mut pairs: Vec<String> = jar
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .map(|s| {
                s.split(';')
                    .map(str::trim)
                    .filter(|kv| {
                        let name = kv.split('=').next().unwrap_or_default();
                        !kv.is_empty() && !explicit.iter().any(|(n, _)| n == name)
                    })
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        pairs.extend(explicit.iter().map(|(name, value)| format!("{name}={value}")));
        pairs.join("; ")
    }

    async fn read(resp: reqwest::Response) -> Result<HttpResponse, YfError> {
        let status = resp.status().as_u16();
        let url = resp.url().clone();
        let headers = resp.headers().clone();
        let cookies = resp
            .cookies()
            .map(|c| Cookie::new(c.name(), c.value()))
            .collect();
        let body = resp.text().await?;

        Ok(HttpResponse {
            status,
            url,
            headers,
            cookies,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, req: GetRequest) -> BoxFuture<'_, Result<HttpResponse, YfError>> {
        Box::pin(async move {
            let client = self.client_for(req.proxy.as_ref()).await?;
            let cookie_header = self.merged_cookies(&req.url, &req.cookies);

            let mut rb = client.get(req.url).timeout(req.timeout);
            for (name, value) in &req.headers {
                rb = rb.header(name.as_str(), value.as_str());
            }
            if !req.params.is_empty() {
                rb = rb.query(&req.params);
            }
            if !req.cookies.is_empty() {
                rb = rb.header(COOKIE, cookie_header);
            }

            Self::read(rb.send().await?).await
        })
    }

    fn post(&self, req: PostRequest) -> BoxFuture<'_, Result<HttpResponse, YfError>> {
        Box::pin(async move {
            let client = self.client_for(req.proxy.as_ref()).await?;

            let mut rb = client.post(req.url).timeout(req.timeout).form(&req.form);
            for (name, value) in &req.headers {
                rb = rb.header(name.as_str(), value.as_str());
            }

            Self::read(rb.send().await?).await
        })
    }
}
