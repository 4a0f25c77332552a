//! Uniform `{errcode, errmsg, ...payload}` response wrapper.
//!
//! Every WeCom endpoint answers with this shape. `errcode == 0` is the only
//! success signal, independent of the HTTP status.

use crate::error::WeComError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Decoded response envelope with a flattened endpoint-specific payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode an envelope from a raw response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, WeComError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Read and decode a response whatever its status.
    ///
    /// A body that decodes as an envelope wins, so `errcode` decides. A
    /// non-2xx status only surfaces when the body is not an envelope.
    pub async fn from_response(resp: reqwest::Response) -> Result<Self, WeComError> {
        let status_error = resp.error_for_status_ref().err();
        let body = resp.bytes().await?;
        Self::decode_with_status(&body, status_error)
    }

    fn decode_with_status(
        body: &[u8],
        status_error: Option<reqwest::Error>,
    ) -> Result<Self, WeComError> {
        match Self::from_slice(body) {
            Ok(envelope) => Ok(envelope),
            Err(decode) => match status_error {
                Some(status) => Err(WeComError::Transport(status)),
                None => Err(decode),
            },
        }
    }
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        self.errcode == 0
    }

    /// Yield the payload, or map a non-zero `errcode` through `reject`.
    pub fn into_result<F>(self, reject: F) -> Result<T, WeComError>
    where
        F: FnOnce(i64, String) -> WeComError,
    {
        if self.errcode == 0 {
            Ok(self.payload)
        } else {
            Err(reject(self.errcode, self.errmsg))
        }
    }
}
