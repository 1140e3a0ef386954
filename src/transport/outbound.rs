//! Outbound effects
//!
//! Sends are fire-and-forget: implementations log failures and never report
//! them back into reminder or transaction state.

use async_trait::async_trait;
use serde::Serialize;

use crate::database::UserId;

#[async_trait]
pub trait Outbound: Send + Sync {
    /// Deliver a text message to a user, optionally with attachments
    async fn send_reply(&self, user_id: UserId, text: &str, attachments: Option<Vec<Attachment>>);

    /// Answer a callback, optionally replacing the originating message
    async fn answer_interactive(
        &self,
        callback_id: &str,
        message: Option<OutgoingMessage>,
        notification: Option<String>,
    );
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    InlineKeyboard { payload: Keyboard },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyboard {
    pub buttons: Vec<Vec<Button>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Button {
    Callback { text: String, payload: String },
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyboard_wire_shape() {
        let attachment = Attachment::InlineKeyboard {
            payload: Keyboard {
                buttons: vec![vec![Button::Callback {
                    text: "Go".into(),
                    payload: "toggle:notifications".into(),
                }]],
            },
        };
        assert_eq!(
            serde_json::to_value(&attachment).unwrap(),
            json!({
                "type": "inline_keyboard",
                "payload": {"buttons": [[{"type": "callback", "text": "Go", "payload": "toggle:notifications"}]]}
            })
        );
    }

    #[test]
    fn test_message_omits_missing_attachments() {
        let message = OutgoingMessage {
            text: "hi".into(),
            attachments: None,
        };
        assert_eq!(serde_json::to_value(&message).unwrap(), json!({"text": "hi"}));
    }
}
