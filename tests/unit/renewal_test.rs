use crate::common::{console, json_msg, login_accepting, portal, renew_answering};
use fc_renew::config::PortalConfig;
use fc_renew::session::auth::{AuthenticatedSession, Session};
use fc_renew::session::renewal::RenewalOutcome;
use mockito::{Matcher, ServerGuard};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::Duration;
use tracing::Span;

async fn logged_in(server: &mut ServerGuard, config: &PortalConfig) -> AuthenticatedSession {
    let _login = login_accepting(server, "alice", "alice-cookie").await;
    let _console = console(server).await;
    Session::new(config, Span::none())
        .unwrap()
        .authenticate("alice", "alice-password")
        .await
        .unwrap()
}

#[tokio::test]
async fn test_renewed() {
    let (mut server, config) = portal().await;
    let session = logged_in(&mut server, &config).await;
    let renew = renew_answering(&mut server, 101, &json_msg("续费成功")).await;

    let outcome = session.renew_machine(101).await;

    assert!(matches!(outcome, RenewalOutcome::Renewed));
    renew.assert_async().await;
}

#[tokio::test]
async fn test_too_early() {
    let (mut server, config) = portal().await;
    let session = logged_in(&mut server, &config).await;
    let renew = renew_answering(&mut server, 102, &json_msg("请在到期前3天后再续费")).await;

    let outcome = session.renew_machine(102).await;

    assert!(matches!(outcome, RenewalOutcome::TooEarly));
    renew.assert_async().await;
}

#[tokio::test]
async fn test_unrecognized_message() {
    let (mut server, config) = portal().await;
    let session = logged_in(&mut server, &config).await;
    let _renew = renew_answering(&mut server, 103, &json_msg("unexpected text")).await;

    match session.renew_machine(103).await {
        RenewalOutcome::UnrecognizedMessage(msg) => assert_eq!(msg, "unexpected text"),
        other => panic!("expected unrecognized message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_html_error_page_is_malformed() {
    let (mut server, config) = portal().await;
    let session = logged_in(&mut server, &config).await;
    let page = "<html><body><h1>502 Bad Gateway</h1></body></html>";
    let _renew = renew_answering(&mut server, 104, page).await;

    match session.renew_machine(104).await {
        RenewalOutcome::MalformedResponse { body } => assert_eq!(body, page),
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_renewal_sends_session_cookie_and_browser_headers() {
    let (mut server, config) = portal().await;
    let session = logged_in(&mut server, &config).await;
    let origin = server.url();
    let renew = server
        .mock("POST", "/server/detail/105/renew")
        .match_header("cookie", Matcher::Regex("PHPSESSID=alice-cookie".to_string()))
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("origin", origin.as_str())
        .match_header("referer", format!("{}/login", origin).as_str())
        .with_status(200)
        .with_body(json_msg("续费成功"))
        .create_async()
        .await;

    let outcome = session.renew_machine(105).await;

    assert!(matches!(outcome, RenewalOutcome::Renewed));
    renew.assert_async().await;
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let (mut server, mut config) = portal().await;
    config.timeout_secs = 1;
    let session = logged_in(&mut server, &config).await;
    let _renew = server
        .mock("POST", "/server/detail/106/renew")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(b"{\"msg\":\"too late\"}")
        })
        .create_async()
        .await;

    let outcome = session.renew_machine(106).await;

    assert!(matches!(outcome, RenewalOutcome::TransportError(_)));
}
