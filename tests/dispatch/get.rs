use crate::common;
use httpmock::Method::GET;
use yfinance_data::{RequestOptions, TickerData, YfError};

#[tokio::test]
async fn get_returns_non_2xx_responses_untouched() {
    let server = common::setup_server();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v10/finance/quoteSummary/NOPE")
            .query_param("crumb", common::CRUMB);
        then.status(404).body("Not Found");
    });

    let client = common::preauth_client(&server);
    let resp = TickerData::new(&client, "NOPE")
        .get(&common::quote_summary_url(&server, "NOPE"), RequestOptions::new())
        .await
        .unwrap();

    api.assert();
    assert_eq!(resp.status(), 404);
    assert!(!resp.is_success());
    assert_eq!(resp.text(), "Not Found");
}

#[tokio::test]
async fn client_user_agent_is_sent_by_default() {
    let server = common::setup_server();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .header("user-agent", "yfinance-data-test/1.0");
        then.status(200).body("{}");
    });

    let client = common::builder(&server)
        .user_agent("yfinance-data-test/1.0")
        .session(yfinance_data::Session::with_credentials(None, common::CRUMB))
        .build()
        .unwrap();
    TickerData::new(&client, "AAPL")
        .get(&server.url("/v7/finance/quote"), RequestOptions::new())
        .await
        .unwrap();

    api.assert();
}

#[tokio::test]
async fn caller_user_agent_overrides_default() {
    let server = common::setup_server();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .header("user-agent", "my-agent")
            .header("accept", "application/json");
        then.status(200).body("{}");
    });

    let client = common::preauth_client(&server);
    TickerData::new(&client, "AAPL")
        .get(
            &server.url("/v7/finance/quote"),
            RequestOptions::new()
                .header("User-Agent", "my-agent")
                .header("Accept", "application/json"),
        )
        .await
        .unwrap();

    api.assert();
}

#[tokio::test]
async fn params_and_cookies_are_sent() {
    let server = common::setup_server();
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("symbols", "AAPL")
            .query_param("crumb", common::CRUMB)
            .header("cookie", "session=xyz");
        then.status(200).body("{}");
    });

    let client = common::preauth_client(&server);
    let resp = TickerData::new(&client, "AAPL")
        .get(
            &server.url("/v7/finance/quote"),
            RequestOptions::new()
                .param("symbols", "AAPL")
                .cookie("session", "xyz"),
        )
        .await
        .unwrap();

    api.assert();
    let sent = resp.url().query().unwrap_or_default().to_string();
    assert!(sent.ends_with(&format!("crumb={}", common::CRUMB)), "query was {sent}");
}

#[tokio::test]
async fn list_params_are_sent_as_repeated_keys() {
    let server = common::setup_server();
    let _api = server.mock(|when, then| {
        when.method(GET).path("/v10/finance/quoteSummary/AAPL");
        then.status(200).body("{}");
    });

    let client = common::preauth_client(&server);
    let resp = TickerData::new(&client, "AAPL")
        .get(
            &common::quote_summary_url(&server, "AAPL"),
            RequestOptions::new().param_list("modules", ["price", "assetProfile"]),
        )
        .await
        .unwrap();

    let sent = resp.url().query().unwrap_or_default().to_string();
    assert!(
        sent.contains("modules=price&modules=assetProfile"),
        "query was {sent}"
    );
}

#[tokio::test]
async fn invalid_url_is_rejected_before_any_request() {
    let server = common::setup_server();
    let flow = common::mock_consent_flow(&server);

    let client = common::consent_client(&server);
    let err = TickerData::new(&client, "AAPL")
        .get("not a url", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, YfError::Url(_)), "got {err:?}");
    assert_eq!(flow.page.hits(), 0);
}

#[tokio::test]
async fn ticker_data_keeps_its_symbol() {
    let client = yfinance_data::YfClient::default();
    let data = TickerData::new(&client, "TSLA");
    assert_eq!(data.symbol(), "TSLA");
}

#[tokio::test]
async fn caller_cookies_are_sent_alongside_session_cookies() {
    let server = common::setup_server();
    let _page = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200).body(common::CONSENT_PAGE);
    });
    let _collect = server.mock(|when, then| {
        when.method(httpmock::Method::POST).path("/v2/collectConsent");
        then.status(200).body("ok");
    });
    let _copy = server.mock(|when, then| {
        when.method(GET).path("/copyConsent");
        then.status(200)
            .header("set-cookie", "A3=consented; Path=/")
            .body("ok");
    });
    let _crumb = server.mock(|when, then| {
        when.method(GET).path("/q2/v1/test/getcrumb");
        then.status(200).body(common::CRUMB);
    });
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("crumb", common::CRUMB)
            .header("cookie", "A3=consented; session=xyz");
        then.status(200).body("{}");
    });

    let client = common::consent_client(&server);
    let resp = TickerData::new(&client, "AAPL")
        .get(
            &server.url("/v7/finance/quote"),
            RequestOptions::new().cookie("session", "xyz"),
        )
        .await
        .unwrap();

    api.assert();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn caller_cookie_replaces_session_cookie_of_the_same_name() {
    let server = common::setup_server();
    let _login = server.mock(|when, then| {
        when.method(GET).path("/login");
        then.status(200).header("set-cookie", "A3=old; Path=/");
    });
    let api = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .header("cookie", "A3=new");
        then.status(200).body("{}");
    });

    let client = common::preauth_client(&server);
    let data = TickerData::new(&client, "AAPL");
    data.get(&server.url("/login"), RequestOptions::new())
        .await
        .unwrap();
    data.get(
        &server.url("/v7/finance/quote"),
        RequestOptions::new().cookie("A3", "new"),
    )
    .await
    .unwrap();

    api.assert();
}
