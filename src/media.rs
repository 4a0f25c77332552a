//! Temporary media upload: local validation, multipart encoding, and the
//! `/cgi-bin/media/upload` call.

use crate::gateway::ApiGateway;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wemessage_core::envelope::Envelope;
use wemessage_core::error::WeComError;

/// Smallest accepted upload; rejects empty or truncated files.
pub const MIN_FILE_SIZE: u64 = 5;
pub const MAX_IMAGE_SIZE: u64 = 2 * 1024 * 1024;
pub const MAX_VOICE_SIZE: u64 = 2 * 1024 * 1024;
pub const MAX_VIDEO_SIZE: u64 = 10 * 1024 * 1024;
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

const UPLOAD_PATH: &str = "/cgi-bin/media/upload";

/// Media kind, sent as the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Voice,
    Video,
    File,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Voice => "voice",
            Self::Video => "video",
            Self::File => "file",
        }
    }

    pub fn max_size(&self) -> u64 {
        match self {
            Self::Image => MAX_IMAGE_SIZE,
            Self::Voice => MAX_VOICE_SIZE,
            Self::Video => MAX_VIDEO_SIZE,
            Self::File => MAX_FILE_SIZE,
        }
    }

    /// Accepted extensions without the dot; `None` means any extension.
    pub fn allowed_extensions(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Image => Some(&["jpg", "jpeg", "png"]),
            Self::Voice => Some(&["amr"]),
            Self::Video => Some(&["mp4"]),
            Self::File => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local file that passed the size and format checks for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub kind: MediaKind,
    pub path: PathBuf,
    pub size: u64,
}

impl MediaAsset {
    /// Validate `path` for `kind` using only file metadata.
    pub async fn inspect(kind: MediaKind, path: impl AsRef<Path>) -> Result<Self, WeComError> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|source| WeComError::MissingFile {
                path: path.to_path_buf(),
                source,
            })?;
        if !meta.is_file() {
            return Err(WeComError::MissingFile {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        Self::check(kind, path, meta.len())
    }

    /// Size bounds first, then the extension whitelist.
    pub fn check(kind: MediaKind, path: &Path, size: u64) -> Result<Self, WeComError> {
        let max = kind.max_size();
        if !(MIN_FILE_SIZE..=max).contains(&size) {
            return Err(WeComError::SizeLimit {
                kind: kind.as_str(),
                size,
                min: MIN_FILE_SIZE,
                max,
            });
        }

        if let Some(allowed) = kind.allowed_extensions() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase();
            if !allowed.contains(&ext.as_str()) {
                return Err(WeComError::Format {
                    kind: kind.as_str(),
                    extension: ext,
                });
            }
        }

        Ok(Self {
            kind,
            path: path.to_path_buf(),
            size,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.kind.as_str().to_string())
    }
}

/// Successful upload payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedMedia {
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub media_id: String,
    #[serde(default)]
    pub created_at: String,
}

impl ApiGateway {
    /// Upload a local file as temporary media and return its `media_id`.
    ///
    /// The ID is short-lived on the provider side; embedding it in a message
    /// before it lapses is up to the caller.
    pub async fn upload_media(
        &self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<String, WeComError> {
        Ok(self.upload_media_detailed(kind, path).await?.media_id)
    }

    /// Like [`ApiGateway::upload_media`] but returns the whole payload.
    pub async fn upload_media_detailed(
        &self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<UploadedMedia, WeComError> {
        let asset = MediaAsset::inspect(kind, path).await?;

        let bytes = tokio::fs::read(&asset.path).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(asset.file_name())
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new().part("media", part);

        let url = self
            .build_authenticated_url(UPLOAD_PATH, &[("type", kind.as_str())])
            .await?;
        debug!(
            "wecom: uploading {} ({} bytes) as {kind}",
            asset.path.display(),
            asset.size
        );

        let resp = self.post_multipart(&url, form).await?;
        let uploaded = Envelope::<UploadedMedia>::from_response(resp)
            .await?
            .into_result(|code, message| {
                warn!("wecom: media upload rejected (errcode {code}): {message}");
                WeComError::Upload { code, message }
            })?;

        info!("wecom: uploaded {kind} media {}", uploaded.media_id);
        Ok(uploaded)
    }
}
