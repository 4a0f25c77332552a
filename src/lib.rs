//! # wemessage
//!
//! Client for WeCom (WeChat Work) application messaging: access-token
//! lifecycle, temporary media upload, and message dispatch.
//!
//! ```no_run
//! use wemessage::{Recipients, TextMessage, WeComClient, WeComConfig};
//!
//! # async fn run() -> Result<(), wemessage::WeComError> {
//! let client = WeComClient::new(WeComConfig::new("ww-corp-id", "app-secret").with_agent_id(1000002))?;
//! let msg = client.message(Recipients::user("alice"), TextMessage::new("deploy finished"))?;
//! let receipt = client.send(&msg).await?;
//! if receipt.is_partial() {
//!     eprintln!("dropped recipients: {:?}", receipt.invalid_users());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credential;
pub mod dispatch;
pub mod gateway;
pub mod media;
pub mod message;

pub use client::WeComClient;
pub use credential::{Clock, CredentialManager, SystemClock};
pub use dispatch::SendReceipt;
pub use gateway::ApiGateway;
pub use media::{MediaAsset, MediaKind, UploadedMedia};
pub use message::*;
pub use wemessage_core::config::{self, WeComConfig};
pub use wemessage_core::error::WeComError;
