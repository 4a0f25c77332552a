//! Per-variant payload structs and their delivery flags.

use serde::Serialize;

fn flag(on: bool) -> Option<u8> {
    Some(u8::from(on))
}

/// `enable_duplicate_check` / `duplicate_check_interval`, shared by every variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_duplicate_check: Option<u8>,
    /// Seconds; the provider default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_check_interval: Option<u32>,
}

impl DuplicateCheck {
    pub fn enabled() -> Self {
        Self {
            enable_duplicate_check: flag(true),
            duplicate_check_interval: None,
        }
    }

    pub fn within(interval_secs: u32) -> Self {
        Self {
            enable_duplicate_check: flag(true),
            duplicate_check_interval: Some(interval_secs),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enable_duplicate_check: flag(false),
            duplicate_check_interval: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRef {
    pub media_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoContent {
    pub media_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextCardContent {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "btntxt", skip_serializing_if = "String::is_empty")]
    pub btn_text: String,
}

/// One news article. Either `url` or a mini-program `appid` should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "picurl", skip_serializing_if = "String::is_empty")]
    pub pic_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub appid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pagepath: String,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_pic_url(mut self, pic_url: impl Into<String>) -> Self {
        self.pic_url = pic_url.into();
        self
    }

    pub fn with_mini_program(mut self, appid: impl Into<String>, pagepath: impl Into<String>) -> Self {
        self.appid = appid.into();
        self.pagepath = pagepath.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsContent {
    pub articles: Vec<Article>,
}

/// Plain text. Accepts `safe`, `enable_id_trans` and duplicate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage {
    pub text: TextContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_id_trans: Option<u8>,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl TextMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: TextContent {
                content: content.into(),
            },
            safe: None,
            enable_id_trans: None,
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn safe(mut self, on: bool) -> Self {
        self.safe = flag(on);
        self
    }

    pub fn enable_id_trans(mut self, on: bool) -> Self {
        self.enable_id_trans = flag(on);
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// Image by `media_id`. Accepts `safe` and duplicate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMessage {
    pub image: MediaRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe: Option<u8>,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl ImageMessage {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            image: MediaRef {
                media_id: media_id.into(),
            },
            safe: None,
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn safe(mut self, on: bool) -> Self {
        self.safe = flag(on);
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// Voice by `media_id`. Duplicate check only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceMessage {
    pub voice: MediaRef,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl VoiceMessage {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            voice: MediaRef {
                media_id: media_id.into(),
            },
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// Video by `media_id` with optional title and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMessage {
    pub video: VideoContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe: Option<u8>,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl VideoMessage {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            video: VideoContent {
                media_id: media_id.into(),
                title: String::new(),
                description: String::new(),
            },
            safe: None,
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.video.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.video.description = description.into();
        self
    }

    pub fn safe(mut self, on: bool) -> Self {
        self.safe = flag(on);
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// Arbitrary file by `media_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMessage {
    pub file: MediaRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe: Option<u8>,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl FileMessage {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            file: MediaRef {
                media_id: media_id.into(),
            },
            safe: None,
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn safe(mut self, on: bool) -> Self {
        self.safe = flag(on);
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// Text card with a link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextCardMessage {
    pub textcard: TextCardContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_id_trans: Option<u8>,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl TextCardMessage {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            textcard: TextCardContent {
                title: title.into(),
                description: description.into(),
                url: url.into(),
                btn_text: String::new(),
            },
            enable_id_trans: None,
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn with_button(mut self, text: impl Into<String>) -> Self {
        self.textcard.btn_text = text.into();
        self
    }

    pub fn enable_id_trans(mut self, on: bool) -> Self {
        self.enable_id_trans = flag(on);
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// News articles (links with cover images).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsMessage {
    pub news: NewsContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_id_trans: Option<u8>,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl NewsMessage {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            news: NewsContent { articles },
            enable_id_trans: None,
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn enable_id_trans(mut self, on: bool) -> Self {
        self.enable_id_trans = flag(on);
        self
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}

/// Markdown body (WeCom subset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownMessage {
    pub markdown: TextContent,
    #[serde(flatten)]
    pub duplicate_check: DuplicateCheck,
}

impl MarkdownMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            markdown: TextContent {
                content: content.into(),
            },
            duplicate_check: DuplicateCheck::default(),
        }
    }

    pub fn duplicate_check(mut self, check: DuplicateCheck) -> Self {
        self.duplicate_check = check;
        self
    }
}
