//! Centralized constants for default endpoints, UA and limits.

use std::time::Duration;

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/39.0.2171.95 Safari/537.36"
);

/// A URL that returns a Set-Cookie header for Yahoo domains.
pub(crate) const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

/// URL to fetch a crumb with the cookie from `DEFAULT_COOKIE_URL`.
pub(crate) const DEFAULT_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

/// Consent page carrying the `csrfToken` and `sessionId` hidden inputs.
pub(crate) const DEFAULT_CONSENT_URL: &str = "https://guce.yahoo.com/consent";

/// Consent form target. `sessionId` is appended as a query parameter.
pub(crate) const DEFAULT_COLLECT_CONSENT_URL: &str = "https://consent.yahoo.com/v2/collectConsent";

/// Consent confirmation endpoint. `sessionId` is appended as a query parameter.
pub(crate) const DEFAULT_COPY_CONSENT_URL: &str = "https://guce.yahoo.com/copyConsent";

/// Crumb endpoint used at the end of the consent flow.
pub(crate) const DEFAULT_CONSENT_CRUMB_URL: &str =
    "https://query2.finance.yahoo.com/v1/test/getcrumb";

/// Where the consent form says to go once accepted.
pub(crate) const CONSENT_DONE_URL: &str = "https://finance.yahoo.com/";

pub(crate) const CONSENT_NAMESPACE: &str = "yahoo";

/// Maximum number of memoized GET responses.
pub(crate) const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Per-request timeout when the caller does not set one.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
