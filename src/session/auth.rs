use crate::config::PortalConfig;
use crate::constants::{CONSOLE_MARKER, CONSOLE_PATH, LOGIN_PATH, LOGOUT_MARKER};
use crate::error::AuthError;
use crate::transport::http_client::{PortalHttpClient, PortalResponse};
use serde::Serialize;
use tracing::{debug, error, info, Instrument, Span};

#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
    mobile: &'static str,
    captcha: &'static str,
    verify_code: &'static str,
    agree: &'static str,
    login_type: &'static str,
    submit: &'static str,
}

impl<'a> LoginForm<'a> {
    fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            username,
            password,
            mobile: "",
            captcha: "",
            verify_code: "",
            agree: "1",
            login_type: "PASS",
            submit: "1",
        }
    }
}

/// A fresh cookie jar and transport for one profile, not yet logged in.
///
/// The client, and with it every cookie, is released when the session is dropped.
#[derive(Debug)]
pub struct Session {
    client: PortalHttpClient,
    span: Span,
}

/// A [`Session`] whose login was accepted by the portal.
///
/// Only obtainable through [`Session::authenticate`], so renewals can never be
/// sent on a session that has not logged in.
#[derive(Debug)]
pub struct AuthenticatedSession {
    inner: Session,
}

impl Session {
    pub fn new(config: &PortalConfig, span: Span) -> anyhow::Result<Self> {
        let client = PortalHttpClient::new(config)?;
        Ok(Self { client, span })
    }

    /// Logs in with a form post and confirms the login by loading the console.
    ///
    /// Consumes the session: on failure it is dropped together with whatever
    /// cookies the portal handed out.
    pub async fn authenticate(
        self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedSession, AuthError> {
        let span = self.span.clone();
        async move {
            info!("🚀 Logging in to FreeCloud as {}", username);
            match self.login(username, password).await {
                Ok(()) => {
                    info!("✅ Login succeeded");
                    Ok(AuthenticatedSession { inner: self })
                }
                Err(e) => {
                    error!("❌ {}", e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let form = LoginForm::new(username, password);
        let response = self.client.post_form(LOGIN_PATH, &form).await?;
        debug!("Login response status: {}", response.status);

        if !is_logged_in(&response) {
            return Err(AuthError::Rejected);
        }

        // Loading the console finalises the session cookies.
        self.client
            .get(CONSOLE_PATH)
            .await
            .map_err(AuthError::Console)?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _enter = self.span.enter();
        debug!("Releasing portal session");
    }
}

impl AuthenticatedSession {
    pub(crate) fn client(&self) -> &PortalHttpClient {
        &self.inner.client
    }

    pub(crate) fn span(&self) -> &Span {
        &self.inner.span
    }
}

/// The login page only shows the logout label, or links to the console, once
/// the credentials were accepted. A redirect straight to the console counts too.
pub(crate) fn is_logged_in(response: &PortalResponse) -> bool {
    response.body.contains(LOGOUT_MARKER)
        || response.body.contains(CONSOLE_MARKER)
        || response.url.path().trim_end_matches('/') == CONSOLE_PATH
}
