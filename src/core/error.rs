use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum YfError {
    /// An error occurred during an HTTP request (timeouts, connection failures, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The cookie or crumb could not be obtained.
    ///
    /// Raised when the bootstrap endpoint sets no cookie, when the crumb endpoint answers
    /// with an empty body or an HTML page, or when the consent page lacks its hidden fields.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The server returned an unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The response body was not valid JSON for the requested type.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
