//! Inbound update model
//!
//! Updates are validated into a tagged union once, here, so nothing past the
//! transport boundary inspects raw JSON.

use serde::Deserialize;

use crate::database::UserId;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "update_type", rename_all = "snake_case")]
pub enum Update {
    MessageCreated {
        #[serde(default)]
        timestamp: i64,
        message: IncomingMessage,
    },
    MessageCallback {
        #[serde(default)]
        timestamp: i64,
        callback: Callback,
    },
    /// Any update kind the bot does not act on
    #[serde(other)]
    Other,
}

impl Update {
    pub fn kind(&self) -> &'static str {
        match self {
            Update::MessageCreated { .. } => "message_created",
            Update::MessageCallback { .. } => "message_callback",
            Update::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub sender: Option<UserRef>,
    #[serde(default)]
    pub recipient: Option<Recipient>,
    #[serde(default)]
    pub body: MessageBody,
}

impl IncomingMessage {
    pub fn user_id(&self) -> Option<UserId> {
        self.sender.as_ref().map(|s| s.user_id)
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.recipient.as_ref().and_then(|r| r.chat_id)
    }

    /// Trimmed text body; media-only messages yield an empty string
    pub fn text(&self) -> &str {
        self.body.text.as_deref().unwrap_or_default().trim()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub chat_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Callback {
    #[serde(default, alias = "id")]
    pub callback_id: Option<String>,
    #[serde(default, alias = "data")]
    pub payload: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}
