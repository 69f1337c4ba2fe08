/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

pub(crate) const DEFAULT_BASE_URL: &str = "https://freecloud.ltd";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const CONSOLE_PATH: &str = "/member/index";

/// Environment variable holding one profile object or an array of them.
pub const PROFILES_ENV_KEY: &str = "FC_PROFILES";

/// Label of the logout link, only rendered for a logged-in user.
pub(crate) const LOGOUT_MARKER: &str = "退出登录";
pub(crate) const CONSOLE_MARKER: &str = "member/index";

pub(crate) const RENEWED_MESSAGE: &str = "续费成功";
pub(crate) const TOO_EARLY_MESSAGE: &str = "请在到期前3天后再续费";

pub(crate) fn renew_path(machine_id: u64) -> String {
    format!("/server/detail/{}/renew", machine_id)
}
