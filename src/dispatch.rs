//! `/cgi-bin/message/send`.

use crate::gateway::ApiGateway;
use crate::message::OutboundMessage;
use serde::Deserialize;
use tracing::{debug, warn};
use wemessage_core::envelope::Envelope;
use wemessage_core::error::WeComError;

const SEND_PATH: &str = "/cgi-bin/message/send";

/// Result of an accepted send.
///
/// A send can succeed while dropping some recipients; those show up in the
/// `invalid_*` fields and are not treated as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendReceipt {
    #[serde(rename = "invaliduser", default)]
    pub invalid_user: String,
    #[serde(rename = "invalidparty", default)]
    pub invalid_party: String,
    #[serde(rename = "invalidtag", default)]
    pub invalid_tag: String,
    #[serde(rename = "unlicenseduser", default)]
    pub unlicensed_user: String,
    #[serde(default)]
    pub msgid: String,
    /// Only set for interactive cards; used to update them later.
    #[serde(default)]
    pub response_code: String,
}

fn split_ids(list: &str) -> Vec<&str> {
    list.split('|').filter(|s| !s.is_empty()).collect()
}

impl SendReceipt {
    /// Some recipients were rejected even though the call succeeded.
    pub fn is_partial(&self) -> bool {
        !(self.invalid_user.is_empty()
            && self.invalid_party.is_empty()
            && self.invalid_tag.is_empty()
            && self.unlicensed_user.is_empty())
    }

    pub fn invalid_users(&self) -> Vec<&str> {
        split_ids(&self.invalid_user)
    }

    pub fn invalid_parties(&self) -> Vec<&str> {
        split_ids(&self.invalid_party)
    }

    pub fn invalid_tags(&self) -> Vec<&str> {
        split_ids(&self.invalid_tag)
    }
}

impl ApiGateway {
    /// Send one message. Partial delivery is reported on the receipt.
    pub async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, WeComError> {
        let body = message.to_json()?;
        let url = self.build_authenticated_url(SEND_PATH, &[]).await?;
        debug!(
            "wecom: sending {} message via agent {}",
            message.msg_type(),
            message.agent_id
        );

        let resp = self.post(&url, "application/json", body).await?;
        let receipt = Envelope::<SendReceipt>::from_response(resp)
            .await?
            .into_result(|code, message| {
                warn!("wecom: message send rejected (errcode {code}): {message}");
                WeComError::Send { code, message }
            })?;

        if receipt.is_partial() {
            warn!(
                "wecom: message {} partially delivered (invaliduser={:?}, invalidparty={:?}, invalidtag={:?})",
                receipt.msgid, receipt.invalid_user, receipt.invalid_party, receipt.invalid_tag
            );
        }
        Ok(receipt)
    }
}
