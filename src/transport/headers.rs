/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/

use crate::config::PortalConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use std::fmt;
use std::fmt::Display;
use tracing::debug;

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Headers that make a request look like it came from the portal's own login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BrowserHeaders {
    pub(crate) user_agent: String,
    pub(crate) referer: String,
    pub(crate) origin: String,
}

impl BrowserHeaders {
    pub(crate) fn new(user_agent: String, referer: String, origin: String) -> Self {
        Self {
            user_agent,
            referer,
            origin,
        }
    }

    /// The portal rejects form posts whose Referer and Origin do not point back at
    /// its login page, so both are derived from the configured base url.
    pub(crate) fn from_config(config: &PortalConfig) -> Self {
        Self::new(
            config.user_agent.clone(),
            config.login_url(),
            config.origin().to_string(),
        )
    }

    /// Builds the header map sent with every form post.
    ///
    /// # Errors
    ///
    /// * `anyhow::Error` - A value contains characters not allowed in a header.
    pub(crate) fn to_header_map(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(REFERER, HeaderValue::from_str(&self.referer)?);
        headers.insert(ORIGIN, HeaderValue::from_str(&self.origin)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        debug!("Browser headers: {}", self);
        Ok(headers)
    }
}

impl Display for BrowserHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"user_agent\":\"{}\",\"referer\":\"{}\",\"origin\":\"{}\",\"content_type\":\"{}\"}}",
            self.user_agent, self.referer, self.origin, FORM_CONTENT_TYPE
        )
    }
}
