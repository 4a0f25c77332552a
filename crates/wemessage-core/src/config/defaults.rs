//! Default value functions used by serde for config deserialization.

pub fn default_base_url() -> String {
    "https://qyapi.weixin.qq.com".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_connect_timeout_secs() -> u64 {
    10
}

/// Fraction of the provider-reported `expires_in` the cached token is trusted for.
pub fn default_token_lifetime_fraction() -> f64 {
    0.5
}
