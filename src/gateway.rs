//! Generic authenticated request layer.
//!
//! `get`/`post` are single round trips with no token handling. Token
//! acquisition happens only in [`ApiGateway::build_authenticated_url`], which
//! both upload and dispatch go through.

use crate::credential::CredentialManager;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::sync::Arc;
use tracing::debug;
use wemessage_core::error::WeComError;

/// HTTP access to the WeCom API on behalf of one corp application.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialManager>,
}

/// `{base}{path}?access_token=...&k=v...`, every value percent-encoded.
pub(crate) fn authenticated_url(
    base_url: &str,
    path: &str,
    token: &str,
    extra_params: &[(&str, &str)],
) -> Result<String, WeComError> {
    let raw = format!("{base_url}{path}");
    let mut url = Url::parse(&raw)
        .map_err(|e| WeComError::Config(format!("invalid endpoint url {raw}: {e}")))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("access_token", token);
        for (key, value) in extra_params {
            query.append_pair(key, value);
        }
    }
    Ok(url.into())
}

impl ApiGateway {
    /// Share `client` and the base URL with the credential manager.
    pub fn new(client: reqwest::Client, credentials: Arc<CredentialManager>) -> Self {
        Self {
            client,
            base_url: credentials.base_url().to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One GET round trip. The token must already be in `url`.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, WeComError> {
        debug!("wecom: GET {}", redact(url));
        Ok(self.client.get(url).send().await?)
    }

    /// One POST round trip with an explicit content type.
    pub async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<reqwest::Response, WeComError> {
        debug!("wecom: POST {} ({content_type})", redact(url));
        Ok(self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?)
    }

    /// POST a multipart form; reqwest sets the boundary content type.
    pub(crate) async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<reqwest::Response, WeComError> {
        debug!("wecom: POST {} (multipart)", redact(url));
        Ok(self.client.post(url).multipart(form).send().await?)
    }

    /// Endpoint URL carrying a currently valid token plus `extra_params`.
    pub async fn build_authenticated_url(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<String, WeComError> {
        let token = self.credentials.get_token().await?;
        authenticated_url(&self.base_url, path, &token, extra_params)
    }
}

/// Path only, so tokens never reach the logs.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
