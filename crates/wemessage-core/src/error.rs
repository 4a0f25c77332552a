use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for wemessage.
#[derive(Debug, Error)]
pub enum WeComError {
    /// Network, DNS, TLS, or timeout failure reaching the provider.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not a well-formed envelope.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The token endpoint rejected the corp identity.
    #[error("authentication failed (errcode {code}): {message}")]
    Auth { code: i64, message: String },

    /// The media endpoint rejected an upload.
    #[error("media upload rejected (errcode {code}): {message}")]
    Upload { code: i64, message: String },

    /// The message endpoint rejected a send.
    #[error("message send rejected (errcode {code}): {message}")]
    Send { code: i64, message: String },

    /// The media file does not exist or cannot be inspected.
    #[error("media file {path} not accessible: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The media file is outside the size bounds for its kind.
    #[error("{kind} file is {size} bytes, allowed range is {min}..={max}")]
    SizeLimit {
        kind: &'static str,
        size: u64,
        min: u64,
        max: u64,
    },

    /// The media file extension is not accepted for its kind.
    #[error("invalid {kind} format: {extension:?}")]
    Format {
        kind: &'static str,
        extension: String,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

impl WeComError {
    /// Provider `errcode` for application-level rejections.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Auth { code, .. } | Self::Upload { code, .. } | Self::Send { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }

    /// Local validation failure raised before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingFile { .. } | Self::SizeLimit { .. } | Self::Format { .. }
        )
    }

    /// Failure that originated at (or on the way to) the provider.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Decode(_)
                | Self::Auth { .. }
                | Self::Upload { .. }
                | Self::Send { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_only_for_application_errors() {
        let auth = WeComError::Auth {
            code: 40013,
            message: "invalid corpid".to_string(),
        };
        assert_eq!(auth.code(), Some(40013));
        assert!(auth.is_remote());
        assert!(!auth.is_precondition());

        let size = WeComError::SizeLimit {
            kind: "image",
            size: 4,
            min: 5,
            max: 2 * 1024 * 1024,
        };
        assert_eq!(size.code(), None);
        assert!(size.is_precondition());
        assert!(!size.is_remote());
    }

    #[test]
    fn test_display_carries_provider_message() {
        let err = WeComError::Send {
            code: 81013,
            message: "user & party & tag all invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "message send rejected (errcode 81013): user & party & tag all invalid"
        );
    }

    #[test]
    fn test_missing_file_is_precondition() {
        let err = WeComError::MissingFile {
            path: PathBuf::from("/nope.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_precondition());
        assert!(err.to_string().contains("/nope.jpg"));
    }
}
