//! Timezone command handlers
//!
//! Handles: settz, gettz
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::context::CommandContext;
use crate::commands::handler::{InboundMessage, IntentHandler, Outcome};
use crate::commands::handlers::split_command;
use crate::features::time::{describe, Zone};

const SETTZ_USAGE: &str = "Usage: /settz UTC+3, /settz UTC-5 or /settz Europe/Moscow";
const SETTZ_INVALID: &str = "Invalid timezone. Examples: UTC+3, UTC-5, UTC+5:30, Europe/Berlin";

pub struct TimezoneHandler;

#[async_trait]
impl IntentHandler for TimezoneHandler {
    fn name(&self) -> &'static str {
        "timezone"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let (head, rest) = split_command(&message.text);
        if head.starts_with("/settz") {
            self.handle_settz(ctx, message, rest).await?;
            return Ok(Outcome::Handled);
        }
        if message.text.eq_ignore_ascii_case("/gettz") {
            self.handle_gettz(ctx, message).await;
            return Ok(Outcome::Handled);
        }
        Ok(Outcome::Skipped)
    }
}

impl TimezoneHandler {
    /// Store the descriptor verbatim once it resolves
    async fn handle_settz(&self, ctx: &CommandContext, message: &InboundMessage, descriptor: &str) -> Result<()> {
        if descriptor.is_empty() {
            ctx.reply(message.user_id, SETTZ_USAGE).await;
            return Ok(());
        }
        if Zone::parse(descriptor).is_err() {
            ctx.reply(message.user_id, SETTZ_INVALID).await;
            return Ok(());
        }

        ctx.database.timezones().set(message.user_id, descriptor).await?;
        info!("User {} timezone set to {descriptor}", message.user_id);
        ctx.reply(message.user_id, &format!("Timezone set: {descriptor}")).await;
        Ok(())
    }

    async fn handle_gettz(&self, ctx: &CommandContext, message: &InboundMessage) {
        let now = ctx.now();
        let reply = match ctx.database.timezones().get(message.user_id).await {
            Some(stored) => format!("Your timezone: {}", describe(&stored, now)),
            None => {
                let default = &ctx.default_timezone;
                // offset-notation defaults are shown as configured
                let shown = if default.starts_with("UTC") {
                    default.clone()
                } else {
                    describe(default, now)
                };
                format!("Using the global timezone: {shown}")
            }
        };
        ctx.reply(message.user_id, &reply).await;
    }
}
