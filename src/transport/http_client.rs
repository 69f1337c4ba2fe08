use crate::config::PortalConfig;
use crate::transport::headers::BrowserHeaders;
use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, instrument};

/// What the portal sent back, with the body already read.
#[derive(Debug, Clone)]
pub struct PortalResponse {
    pub status: StatusCode,
    /// Final url after redirects were followed.
    pub url: Url,
    pub body: String,
}

/// HTTP client for the hosting portal, with its own cookie store.
///
/// Every instance starts with an empty jar, so two clients never share a login.
#[derive(Debug)]
pub struct PortalHttpClient {
    client: Client,
    base_url: String,
    form_headers: HeaderMap,
}

impl PortalHttpClient {
    /// Creates a new instance of the PortalHttpClient.
    ///
    /// # Arguments
    ///
    /// * `config` - Base url, timeout and user agent of the portal.
    ///
    /// # Returns
    ///
    /// A Result containing the PortalHttpClient instance or an error.
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let form_headers = BrowserHeaders::from_config(config)
            .to_header_map()
            .context("Failed to build browser headers")?;

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.origin().to_string(),
            form_headers,
        })
    }

    /// Sends a url-encoded form POST with the browser headers.
    #[instrument(skip(self, form))]
    pub async fn post_form<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        form: &B,
    ) -> Result<PortalResponse, reqwest::Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Sending POST request to {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.form_headers.clone())
            .form(form)
            .send()
            .await?;

        Self::read_response(response).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, endpoint: &str) -> Result<PortalResponse, reqwest::Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Sending GET request to {}", url);

        let response = self.client.get(&url).send().await?;

        Self::read_response(response).await
    }

    async fn read_response(response: reqwest::Response) -> Result<PortalResponse, reqwest::Error> {
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        debug!("Response Status: {}, Url: {}", status, url);
        debug!("Response Body: {}", body);

        Ok(PortalResponse { status, url, body })
    }
}
