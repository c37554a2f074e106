use crate::common;
use std::time::Duration;
use yfinance_data::{CrumbState, CrumbStrategy, RequestOptions, TickerData, YfError};

#[tokio::test]
async fn consent_flow_is_the_default_and_runs_every_step_once() {
    let server = common::setup_server();
    let flow = common::mock_consent_flow(&server);
    let (cookie, direct_crumb) = common::mock_cookie_crumb(&server);
    let api = common::mock_quote_summary(&server, "AAPL", common::CRUMB);

    let client = common::consent_client(&server);
    assert_eq!(client.crumb_strategy(), CrumbStrategy::Consent);

    let data = TickerData::new(&client, "AAPL");
    let url = common::quote_summary_url(&server, "AAPL");
    data.get(&url, RequestOptions::new()).await.unwrap();
    data.get(&url, RequestOptions::new()).await.unwrap();

    flow.page.assert();
    flow.collect.assert();
    flow.copy.assert();
    flow.crumb.assert();
    api.assert_calls(2);

    assert_eq!(cookie.hits(), 0);
    assert_eq!(direct_crumb.hits(), 0);
    assert_eq!(client.session().state().await, CrumbState::Present);
}

#[tokio::test]
async fn consent_page_without_csrf_token_is_an_error() {
    let server = common::setup_server();
    let page = r#"<html><body><form>
        <input type="hidden" name="sessionId" value="sess-456">
    </form></body></html>"#;
    let flow = common::mock_consent_flow_with(&server, page, common::CRUMB);

    let client = common::consent_client(&server);
    let err = client
        .get_crumb_consent(None, Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        YfError::Auth(s) => assert!(s.contains("csrfToken"), "unexpected: {s}"),
        other => panic!("expected Auth error, got {other:?}"),
    }
    flow.page.assert();
    assert_eq!(flow.collect.hits(), 0);
    assert_eq!(flow.crumb.hits(), 0);
}

#[tokio::test]
async fn consent_crumb_html_body_is_an_error() {
    let server = common::setup_server();
    let flow = common::mock_consent_flow_with(
        &server,
        common::CONSENT_PAGE,
        "<html><head><title>Yahoo</title></head></html>",
    );

    let client = common::consent_client(&server);
    let err = client.crumb().await.unwrap_err();

    match err {
        YfError::Auth(s) => assert!(s.contains("Received invalid crumb"), "unexpected: {s}"),
        other => panic!("expected Auth error, got {other:?}"),
    }
    flow.crumb.assert();
    assert_eq!(client.session().state().await, CrumbState::Absent);
}

#[tokio::test]
async fn consent_crumb_empty_body_is_an_error() {
    let server = common::setup_server();
    let _flow = common::mock_consent_flow_with(&server, common::CONSENT_PAGE, "");

    let client = common::consent_client(&server);
    let err = client
        .get_crumb_consent(None, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, YfError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn failed_fetch_is_not_retried_automatically() {
    let server = common::setup_server();
    let flow = common::mock_consent_flow_with(&server, common::CONSENT_PAGE, "");
    let api = common::mock_quote_summary(&server, "AAPL", common::CRUMB);

    let client = common::consent_client(&server);
    let data = TickerData::new(&client, "AAPL");
    let err = data
        .get(&common::quote_summary_url(&server, "AAPL"), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, YfError::Auth(_)), "got {err:?}");
    flow.crumb.assert_calls(1);
    assert_eq!(api.hits(), 0);
}
