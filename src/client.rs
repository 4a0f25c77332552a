//! [`WeComClient`]: one shared handle per corp application.

use crate::credential::{Clock, CredentialManager};
use crate::dispatch::SendReceipt;
use crate::gateway::ApiGateway;
use crate::media::{MediaKind, UploadedMedia};
use crate::message::{OutboundMessage, Payload, Recipients};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use wemessage_core::config::WeComConfig;
use wemessage_core::error::WeComError;

/// Cheap to clone; clones share the transport and the token cache.
#[derive(Debug, Clone)]
pub struct WeComClient {
    config: Arc<WeComConfig>,
    gateway: ApiGateway,
}

impl WeComClient {
    /// Validate `config` and build the HTTP transport with its timeouts.
    pub fn new(config: WeComConfig) -> Result<Self, WeComError> {
        Self::build(config, None)
    }

    /// Same as [`WeComClient::new`] with an injected clock for expiry checks.
    pub fn with_clock(config: WeComConfig, clock: Arc<dyn Clock>) -> Result<Self, WeComError> {
        Self::build(config, Some(clock))
    }

    fn build(config: WeComConfig, clock: Option<Arc<dyn Clock>>) -> Result<Self, WeComError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        let mut credentials = CredentialManager::new(
            config.corp_id.clone(),
            config.corp_secret.clone(),
            config.base(),
            http.clone(),
        )
        .with_lifetime_fraction(config.token_lifetime_fraction);
        if let Some(clock) = clock {
            credentials = credentials.with_clock(clock);
        }

        info!(
            "wecom: client ready for corp {} at {}",
            config.corp_id,
            config.base()
        );
        Ok(Self {
            gateway: ApiGateway::new(http, Arc::new(credentials)),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &WeComConfig {
        &self.config
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub fn credentials(&self) -> &CredentialManager {
        self.gateway.credentials()
    }

    pub async fn access_token(&self) -> Result<String, WeComError> {
        self.credentials().get_token().await
    }

    /// Pre-warm the token cache; a no-op while the cached token is valid.
    pub async fn renew_token(&self) -> Result<(), WeComError> {
        self.credentials().renew().await
    }

    pub async fn is_token_expired(&self) -> bool {
        self.credentials().is_expired().await
    }

    pub async fn upload_media(
        &self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<String, WeComError> {
        self.gateway.upload_media(kind, path).await
    }

    pub async fn upload_media_detailed(
        &self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<UploadedMedia, WeComError> {
        self.gateway.upload_media_detailed(kind, path).await
    }

    pub async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, WeComError> {
        self.gateway.send(message).await
    }

    /// Address `payload` from the configured default `agent_id`.
    pub fn message(
        &self,
        recipients: Recipients,
        payload: impl Into<Payload>,
    ) -> Result<OutboundMessage, WeComError> {
        let agent_id = self
            .config
            .agent_id
            .ok_or_else(|| WeComError::Config("agent_id is not configured".to_string()))?;
        Ok(OutboundMessage::new(agent_id, recipients, payload))
    }
}
