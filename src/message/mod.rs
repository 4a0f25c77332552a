//! Outbound application messages for `/cgi-bin/message/send`.
//!
//! [`Payload`] is a closed set of variants; `msgtype` is written from the
//! variant tag, so it can never disagree with the nested payload key. Each
//! variant only carries the delivery flags the provider accepts for it.

mod types;


pub use types::*;

use serde::Serialize;
use wemessage_core::error::WeComError;

/// Addressing header. Empty fields are left out of the body.
///
/// Multiple IDs go into one field joined by the separator the caller's
/// tenant expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recipients {
    #[serde(rename = "touser", skip_serializing_if = "String::is_empty")]
    pub to_user: String,
    #[serde(rename = "toparty", skip_serializing_if = "String::is_empty")]
    pub to_party: String,
    #[serde(rename = "totag", skip_serializing_if = "String::is_empty")]
    pub to_tag: String,
}

impl Recipients {
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            to_user: user.into(),
            ..Default::default()
        }
    }

    pub fn party(party: impl Into<String>) -> Self {
        Self {
            to_party: party.into(),
            ..Default::default()
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            to_tag: tag.into(),
            ..Default::default()
        }
    }

    /// Every member visible to the application.
    pub fn all() -> Self {
        Self::user("@all")
    }

    pub fn and_party(mut self, party: impl Into<String>) -> Self {
        self.to_party = party.into();
        self
    }

    pub fn and_tag(mut self, tag: impl Into<String>) -> Self {
        self.to_tag = tag.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.to_user.is_empty() && self.to_party.is_empty() && self.to_tag.is_empty()
    }
}

/// One message ready to send: header plus a tagged payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    #[serde(flatten)]
    pub recipients: Recipients,
    #[serde(rename = "agentid")]
    pub agent_id: i64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl OutboundMessage {
    pub fn new(agent_id: i64, recipients: Recipients, payload: impl Into<Payload>) -> Self {
        Self {
            recipients,
            agent_id,
            payload: payload.into(),
        }
    }

    pub fn msg_type(&self) -> &'static str {
        self.payload.msg_type()
    }

    /// JSON body expected by the send endpoint.
    pub fn to_json(&self) -> Result<Vec<u8>, WeComError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Variant-specific body, tagged by `msgtype`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum Payload {
    Text(TextMessage),
    Image(ImageMessage),
    Voice(VoiceMessage),
    Video(VideoMessage),
    File(FileMessage),
    TextCard(TextCardMessage),
    News(NewsMessage),
    Markdown(MarkdownMessage),
}

impl Payload {
    pub fn msg_type(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Voice(_) => "voice",
            Self::Video(_) => "video",
            Self::File(_) => "file",
            Self::TextCard(_) => "textcard",
            Self::News(_) => "news",
            Self::Markdown(_) => "markdown",
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(m: $ty) -> Self {
                    Payload::$variant(m)
                }
            }
        )*
    };
}

impl_from_variant!(
    Text(TextMessage),
    Image(ImageMessage),
    Voice(VoiceMessage),
    Video(VideoMessage),
    File(FileMessage),
    TextCard(TextCardMessage),
    News(NewsMessage),
    Markdown(MarkdownMessage),
);
