//! Extraction of the hidden inputs on the Yahoo consent page.

use crate::core::error::YfError;
use scraper::{Html, Selector};

/// The two hidden values the consent form must echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentForm {
    pub csrf_token: String,
    pub session_id: String,
}

impl ConsentForm {
    /// The form body accepted by the `collectConsent` endpoint.
    pub(crate) fn fields(&self, done_url: &str, namespace: &str) -> Vec<(String, String)> {
        vec![
            ("agree".into(), "agree".into()),
            ("agree".into(), "agree".into()),
            ("consentUUID".into(), "default".into()),
            ("sessionId".into(), self.session_id.clone()),
            ("csrfToken".into(), self.csrf_token.clone()),
            ("originalDoneUrl".into(), done_url.into()),
            ("namespace".into(), namespace.into()),
        ]
    }
}

/// Pulls `csrfToken` and `sessionId` out of the consent page.
///
/// # Errors
///
/// Returns `YfError::Auth` naming the first input that is missing or has no `value`.
pub fn extract_consent_form(html: &str) -> Result<ConsentForm, YfError> {
    let doc = Html::parse_document(html);
    Ok(ConsentForm {
        csrf_token: input_value(&doc, "csrfToken")?,
        session_id: input_value(&doc, "sessionId")?,
    })
}

fn input_value(doc: &Html, name: &str) -> Result<String, YfError> {
    let selector = Selector::parse(&format!(r#"input[name="{name}"]"#))
        .map_err(|e| YfError::Auth(format!("bad selector for `{name}`: {e}")))?;
    doc.select(&selector)
        .find_map(|el| el.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| YfError::Auth(format!("consent page has no `{name}` input")))
}
