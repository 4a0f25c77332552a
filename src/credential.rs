//! Access-token lifecycle.
//!
//! The token is fetched lazily from `/cgi-bin/gettoken` and cached for a
//! configurable fraction of the lifetime the provider reports. Concurrent
//! callers that find the cache expired queue on a single write lock, so at
//! most one renewal request is in flight per manager.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wemessage_core::envelope::Envelope;
use wemessage_core::error::WeComError;

/// Longest time a token is trusted, whatever `expires_in` says.
pub const MAX_TRUSTED_SECS: i64 = 24 * 60 * 60;

const DEFAULT_LIFETIME_FRACTION: f64 = 0.5;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

/// Seconds to cache a token for, within `0..=MAX_TRUSTED_SECS`.
fn trusted_lifetime(expires_in: i64, fraction: f64) -> i64 {
    let secs = (expires_in.max(0) as f64 * fraction) as i64;
    secs.clamp(0, MAX_TRUSTED_SECS)
}

/// Cached token and the instant it stops being trusted.
struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    fn empty() -> Self {
        Self {
            token: String::new(),
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Owns the corp identity and the cached access token.
pub struct CredentialManager {
    corp_id: String,
    corp_secret: String,
    base_url: String,
    client: reqwest::Client,
    lifetime_fraction: f64,
    clock: Arc<dyn Clock>,
    cache: RwLock<Credential>,
}

impl CredentialManager {
    pub fn new(
        corp_id: impl Into<String>,
        corp_secret: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            corp_id: corp_id.into(),
            corp_secret: corp_secret.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            lifetime_fraction: DEFAULT_LIFETIME_FRACTION,
            clock: Arc::new(SystemClock),
            cache: RwLock::new(Credential::empty()),
        }
    }

    /// Trust the token for `fraction` of the reported `expires_in`.
    ///
    /// Values outside (0, 1] fall back to the default of one half.
    pub fn with_lifetime_fraction(mut self, fraction: f64) -> Self {
        if fraction > 0.0 && fraction <= 1.0 {
            self.lifetime_fraction = fraction;
        } else {
            warn!(
                "wecom: token lifetime fraction {fraction} outside (0, 1], using {DEFAULT_LIFETIME_FRACTION}"
            );
            self.lifetime_fraction = DEFAULT_LIFETIME_FRACTION;
        }
        self
    }

    pub fn lifetime_fraction(&self) -> f64 {
        self.lifetime_fraction
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn corp_id(&self) -> &str {
        &self.corp_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// When the cached token stops being trusted (minimum timestamp before the first renewal).
    pub async fn expires_at(&self) -> DateTime<Utc> {
        self.cache.read().await.expires_at
    }

    /// True when the clock is at or past the cached expiry.
    pub async fn is_expired(&self) -> bool {
        let now = self.clock.now();
        self.cache.read().await.is_expired(now)
    }

    /// Fetch a fresh token unless the cached one is still valid.
    pub async fn renew(&self) -> Result<(), WeComError> {
        self.renew_locked().await.map(|_| ())
    }

    /// Return a token valid for immediate use, renewing if needed.
    pub async fn get_token(&self) -> Result<String, WeComError> {
        {
            let cache = self.cache.read().await;
            if !cache.is_expired(self.clock.now()) {
                return Ok(cache.token.clone());
            }
        }
        self.renew_locked().await
    }

    /// Check-then-renew under the write lock; returns the resulting token.
    async fn renew_locked(&self) -> Result<String, WeComError> {
        let mut cache = self.cache.write().await;
        if !cache.is_expired(self.clock.now()) {
            return Ok(cache.token.clone());
        }

        let (token, expires_in) = self.fetch_token().await?;

        let now = self.clock.now();
        let trusted_secs = trusted_lifetime(expires_in, self.lifetime_fraction);
        cache.token = token;
        cache.expires_at = Duration::try_seconds(trusted_secs)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        info!(
            "wecom: access token renewed for corp {} (expires_in={}s, trusted for {}s)",
            self.corp_id, expires_in, trusted_secs
        );
        Ok(cache.token.clone())
    }

    async fn fetch_token(&self) -> Result<(String, i64), WeComError> {
        let url = format!("{}/cgi-bin/gettoken", self.base_url);
        debug!("wecom: GET {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("corpid", self.corp_id.as_str()),
                ("corpsecret", self.corp_secret.as_str()),
            ])
            .send()
            .await?;

        let payload = Envelope::<TokenPayload>::from_response(resp)
            .await?
            .into_result(|code, message| {
                warn!("wecom: token request rejected (errcode {code}): {message}");
                WeComError::Auth { code, message }
            })?;

        Ok((payload.access_token, payload.expires_in))
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("corp_id", &self.corp_id)
            .field("base_url", &self.base_url)
            .field("lifetime_fraction", &self.lifetime_fraction)
            .finish_non_exhaustive()
    }
}
