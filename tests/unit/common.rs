use fc_renew::config::{PortalConfig, Profile};
use fc_renew::utils::logger::setup_logger;
use mockito::{Matcher, Mock, ServerGuard};

pub const LOGGED_IN_PAGE: &str = "<html><a href=\"/logout\">退出登录</a></html>";

pub async fn portal() -> (ServerGuard, PortalConfig) {
    setup_logger();
    let server = mockito::Server::new_async().await;
    let config = PortalConfig::with_base_url(&server.url());
    (server, config)
}

pub fn profile(username: &str, machines: &[u64]) -> Profile {
    Profile {
        username: username.to_string(),
        password: format!("{}-password", username),
        machine_ids: machines.to_vec(),
    }
}

/// Login endpoint that accepts `username` and hands out a session cookie.
pub async fn login_accepting(server: &mut ServerGuard, username: &str, cookie: &str) -> Mock {
    server
        .mock("POST", "/login")
        .match_body(Matcher::UrlEncoded("username".into(), username.into()))
        .with_status(200)
        .with_header("set-cookie", format!("PHPSESSID={}; Path=/", cookie).as_str())
        .with_body(LOGGED_IN_PAGE)
        .create_async()
        .await
}

pub async fn console(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/member/index")
        .with_status(200)
        .with_body(LOGGED_IN_PAGE)
        .create_async()
        .await
}

pub async fn renew_answering(server: &mut ServerGuard, machine_id: u64, body: &str) -> Mock {
    server
        .mock("POST", format!("/server/detail/{}/renew", machine_id).as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("month".into(), "1".into()),
            Matcher::UrlEncoded("submit".into(), "1".into()),
            Matcher::UrlEncoded("coupon_id".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

pub fn json_msg(msg: &str) -> String {
    serde_json::json!({ "msg": msg }).to_string()
}
