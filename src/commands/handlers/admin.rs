//! Feature flag command handler
//!
//! Handles: main
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Global notification/transaction switches with an inline menu
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::context::CommandContext;
use crate::commands::handler::{InboundMessage, IntentHandler, Outcome};
use crate::core::Feature;
use crate::message_components::{current_flags, main_keyboard, main_menu_text};

const USAGE: &str = "Usage: /main <feature> on|off";
const UNKNOWN_FEATURE: &str = "Unknown feature. Allowed: notifications, transactions";

/// Handler for `/main` and `/main <feature> on|off`
pub struct AdminHandler;

#[async_trait]
impl IntentHandler for AdminHandler {
    fn name(&self) -> &'static str {
        "admin"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let parts: Vec<&str> = message.text.split_whitespace().collect();
        let Some(head) = parts.first() else {
            return Ok(Outcome::Skipped);
        };
        if !head.to_lowercase().starts_with("/main") {
            return Ok(Outcome::Skipped);
        }

        let user_id = message.user_id;
        match parts.as_slice() {
            [_] => {
                let (notifications, transactions) = current_flags(ctx).await;
                ctx.reply_with(
                    user_id,
                    &main_menu_text(notifications, transactions),
                    main_keyboard(notifications, transactions),
                )
                .await;
            }
            [_, feature, value, ..] => {
                let Ok(feature) = feature.parse::<Feature>() else {
                    ctx.reply(user_id, UNKNOWN_FEATURE).await;
                    return Ok(Outcome::Handled);
                };
                let enabled = match value.to_lowercase().as_str() {
                    "on" | "1" | "true" => true,
                    "off" | "0" | "false" => false,
                    _ => {
                        ctx.reply(user_id, USAGE).await;
                        return Ok(Outcome::Handled);
                    }
                };
                ctx.database.features().set(feature, enabled).await?;
                info!("User {user_id} set {feature} {}", if enabled { "on" } else { "off" });
                let state = if enabled { "enabled" } else { "disabled" };
                ctx.reply(user_id, &format!("{feature} {state}")).await;
            }
            _ => ctx.reply(user_id, USAGE).await,
        }
        Ok(Outcome::Handled)
    }
}
