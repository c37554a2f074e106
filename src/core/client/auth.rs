//! Cookie & crumb acquisition for Yahoo endpoints.

use super::consent::extract_consent_form;
use super::constants::{CONSENT_DONE_URL, CONSENT_NAMESPACE};
use super::proxy::ProxyConfig;
use crate::core::error::YfError;
use crate::core::transport::{Cookie, GetRequest, PostRequest};
use std::time::Duration;
use url::Url;

/// How a missing crumb is obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrumbStrategy {
    /// Fetch a cookie from the bootstrap host, then ask the crumb endpoint with it.
    Direct,
    /// Walk the consent flow (consent page, form post, confirmation), then ask the crumb endpoint.
    #[default]
    Consent,
}

impl super::YfClient {
    /// Returns the session crumb, fetching it with the configured [`CrumbStrategy`] if absent.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Auth` if no usable crumb could be obtained, or any transport error.
    pub async fn crumb(&self) -> Result<String, YfError> {
        self.ensure_crumb(None, self.timeout).await
    }

    pub(crate) async fn ensure_crumb(
        &self,
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Result<String, YfError> {
        // Fast path: crumb already present.
        if let Some(crumb) = self.session.crumb().await {
            return Ok(crumb);
        }

        let _guard = self.session.lock_fetch().await;

        // Another task may have fetched it while this one waited.
        if let Some(crumb) = self.session.crumb().await {
            return Ok(crumb);
        }

        match self.crumb_strategy {
            CrumbStrategy::Direct => self.get_crumb(proxy, timeout).await,
            CrumbStrategy::Consent => self.get_crumb_consent(proxy, timeout).await,
        }
    }

    /// Returns the session cookie, fetching it from the bootstrap URL if absent.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Auth` if the bootstrap response sets no cookie.
    pub async fn get_cookie(
        &self,
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Result<Cookie, YfError> {
        if let Some(cookie) = self.session.cookie().await {
            return Ok(cookie);
        }

        tracing::debug!(url = %self.cookie_url, "fetching cookie");
        let resp = self
            .transport
            .get(self.auth_get(self.cookie_url.clone(), proxy, timeout))
            .await?;

        let cookie = resp.cookies().first().cloned().ok_or_else(|| {
            YfError::Auth(format!("No cookie received from {}", self.cookie_url))
        })?;

        tracing::debug!(name = %cookie.name, "cookie received");
        self.session.set_cookie(cookie.clone()).await;
        Ok(cookie)
    }

    /// Fetches a crumb from the crumb endpoint using the session cookie, and stores it.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Auth` if the cookie cannot be obtained or the body is not a crumb.
    pub async fn get_crumb(
        &self,
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Result<String, YfError> {
        let cookie = self.get_cookie(proxy, timeout).await?;

        tracing::debug!(url = %self.crumb_url, "fetching crumb");
        let mut req = self.auth_get(self.crumb_url.clone(), proxy, timeout);
        req.cookies.push((cookie.name, cookie.value));
        let resp = self.transport.get(req).await?;

        self.store_crumb(resp.text()).await
    }

    /// Fetches a crumb through the consent flow, and stores it.
    ///
    /// # Errors
    ///
    /// Returns `YfError::Auth` if the consent page lacks its hidden inputs or the final body
    /// is not a crumb.
    pub async fn get_crumb_consent(
        &self,
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Result<String, YfError> {
        tracing::debug!(url = %self.consent_url, "fetching consent page");
        let page = self
            .transport
            .get(self.auth_get(self.consent_url.clone(), proxy, timeout))
            .await?;
        let form = extract_consent_form(page.text())?;

        let mut collect_url = self.collect_consent_url.clone();
        collect_url
            .query_pairs_mut()
            .append_pair("sessionId", &form.session_id);
        tracing::debug!(url = %collect_url, "posting consent form");
        let resp = self
            .transport
            .post(PostRequest {
                url: collect_url,
                form: form.fields(CONSENT_DONE_URL, CONSENT_NAMESPACE),
                headers: self.default_headers(),
                proxy: proxy.cloned(),
                timeout,
            })
            .await?;
        tracing::debug!(status = resp.status(), "consent form posted");

        let mut copy = self.auth_get(self.copy_consent_url.clone(), proxy, timeout);
        copy.params.push(("sessionId".into(), form.session_id.clone()));
        tracing::debug!(url = %self.copy_consent_url, "confirming consent");
        let resp = self.transport.get(copy).await?;
        tracing::debug!(status = resp.status(), "consent confirmed");

        tracing::debug!(url = %self.consent_crumb_url, "fetching crumb");
        let resp = self
            .transport
            .get(self.auth_get(self.consent_crumb_url.clone(), proxy, timeout))
            .await?;

        self.store_crumb(resp.text()).await
    }

    async fn store_crumb(&self, body: &str) -> Result<String, YfError> {
        let crumb = validate_crumb(body)?;
        tracing::debug!(crumb = %crumb, "crumb received");
        self.session.set_crumb(crumb.clone()).await;
        Ok(crumb)
    }

    fn auth_get(&self, url: Url, proxy: Option<&ProxyConfig>, timeout: Duration) -> GetRequest {
        GetRequest {
            url,
            headers: self.default_headers(),
            params: Vec::new(),
            cookies: Vec::new(),
            proxy: proxy.cloned(),
            timeout,
        }
    }
}

fn validate_crumb(body: &str) -> Result<String, YfError> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.contains('<') || crumb.contains('{') {
        return Err(YfError::Auth(format!("Received invalid crumb: {crumb:?}")));
    }
    Ok(crumb.to_string())
}
