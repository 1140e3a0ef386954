//! # Message Components
//!
//! The `/main` feature menu: its inline keyboard and the callbacks its
//! buttons send back.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Feature toggle keyboard for the Max inline keyboard API
//! - 1.0.0: Initial button and modal handling

use anyhow::Result;
use log::{debug, info};

use crate::commands::CommandContext;
use crate::core::Feature;
use crate::transport::{Attachment, Button, Callback, Keyboard, OutgoingMessage};

pub const TOGGLE_PREFIX: &str = "toggle:";

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn main_menu_text(notifications: bool, transactions: bool) -> String {
    format!(
        "Main menu\n\nNotifications: {}\nTransactions: {}\n\nTap a button to toggle",
        on_off(notifications),
        on_off(transactions)
    )
}

/// One toggle button per row
pub fn main_keyboard(notifications: bool, transactions: bool) -> Vec<Attachment> {
    let label = |enabled: bool| if enabled { "On" } else { "Off" };
    let button = |text: String, feature: Feature| {
        vec![Button::Callback {
            text,
            payload: format!("{TOGGLE_PREFIX}{feature}"),
        }]
    };
    vec![Attachment::InlineKeyboard {
        payload: Keyboard {
            buttons: vec![
                button(format!("🔔 Notifications: {}", label(notifications)), Feature::Notifications),
                button(format!("💸 Transactions: {}", label(transactions)), Feature::Transactions),
            ],
        },
    }]
}

pub fn main_menu(notifications: bool, transactions: bool) -> OutgoingMessage {
    OutgoingMessage {
        text: main_menu_text(notifications, transactions),
        attachments: Some(main_keyboard(notifications, transactions)),
    }
}

/// Current flags as `(notifications, transactions)`
pub async fn current_flags(ctx: &CommandContext) -> (bool, bool) {
    (
        ctx.feature_enabled(Feature::Notifications).await,
        ctx.feature_enabled(Feature::Transactions).await,
    )
}

/// Handler for inline keyboard callbacks
pub struct MessageComponentHandler {
    context: CommandContext,
}

impl MessageComponentHandler {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Toggle payloads flip their flag and refresh the menu; any other
    /// payload is acknowledged without changes
    pub async fn handle_callback(&self, callback: &Callback) -> Result<()> {
        let Some(callback_id) = callback.callback_id.as_deref() else {
            debug!("Callback without an id, nothing to answer");
            return Ok(());
        };
        let payload = callback.payload.as_deref().unwrap_or_default();
        info!("Processing callback {callback_id} with payload '{payload}'");

        let feature = payload
            .strip_prefix(TOGGLE_PREFIX)
            .and_then(|name| name.parse::<Feature>().ok());
        let Some(feature) = feature else {
            self.context
                .outbound
                .answer_interactive(callback_id, None, None)
                .await;
            return Ok(());
        };

        let enabled = self.context.database.features().toggle(feature).await?;
        info!("Feature {feature} toggled {}", on_off(enabled));

        let (notifications, transactions) = current_flags(&self.context).await;
        self.context
            .outbound
            .answer_interactive(callback_id, Some(main_menu(notifications, transactions)), None)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_text_shows_flags() {
        assert_eq!(
            main_menu_text(true, false),
            "Main menu\n\nNotifications: on\nTransactions: off\n\nTap a button to toggle"
        );
    }

    #[test]
    fn test_keyboard_payloads() {
        let keyboard = main_keyboard(false, true);
        let [Attachment::InlineKeyboard { payload }] = keyboard.as_slice() else {
            panic!("expected a single keyboard");
        };
        let payloads: Vec<_> = payload
            .buttons
            .iter()
            .flatten()
            .map(|Button::Callback { text, payload }| (text.as_str(), payload.as_str()))
            .collect();
        assert_eq!(
            payloads,
            vec![
                ("🔔 Notifications: Off", "toggle:notifications"),
                ("💸 Transactions: On", "toggle:transactions"),
            ]
        );
    }
}
