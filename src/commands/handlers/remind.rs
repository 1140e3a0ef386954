//! Reminder handlers
//!
//! Handles: note, notedel, and the freeform reminder intents (a bare time
//! expression, `HH:MM text` in one line, and the body following a bare time)
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Wall-clock reminders in the user's timezone with a pending body step
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use regex::Regex;
use std::sync::OnceLock;

use crate::commands::context::{error_reply, CommandContext};
use crate::commands::handler::{InboundMessage, IntentHandler, Outcome};
use crate::commands::handlers::split_command;
use crate::core::{BotError, Feature};
use crate::database::{PendingState, ReminderCommit};
use crate::features::time::parse_time_expression;

const REMINDER_SET: &str = "✅ Reminder set";
const ASK_FOR_TEXT: &str = "Send the reminder text in your next message";
const CANCELLED: &str = "🔕 Notifications are disabled, reminder cancelled";

fn inline_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2}:\d{2})\s+(.+)$").expect("reminder pattern is valid"))
}

/// Create the reminder and reply with the outcome
async fn commit_reminder(
    ctx: &CommandContext,
    user_id: i64,
    due_at: DateTime<Utc>,
    text: &str,
) -> Result<()> {
    match ctx.database.reminders().create(user_id, due_at, text).await {
        Ok(_) => ctx.reply(user_id, REMINDER_SET).await,
        Err(e @ BotError::LimitExceeded { .. }) => {
            info!("User {user_id} hit the reminder cap");
            ctx.reply(user_id, &error_reply(&e)).await;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Handler for reminder commands: note, notedel
pub struct RemindHandler;

#[async_trait]
impl IntentHandler for RemindHandler {
    fn name(&self) -> &'static str {
        "remind"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let (head, rest) = split_command(&message.text);
        if message.text.eq_ignore_ascii_case("/note") {
            self.handle_note(ctx, message).await;
        } else if head.starts_with("/notedel") {
            self.handle_notedel(ctx, message, rest).await?;
        } else {
            return Ok(Outcome::Skipped);
        }
        Ok(Outcome::Handled)
    }
}

impl RemindHandler {
    /// Numbered `N. HH:MM — text` list of active reminders
    async fn handle_note(&self, ctx: &CommandContext, message: &InboundMessage) {
        if !ctx.feature_enabled(Feature::Notifications).await {
            ctx.reply_disabled(message.user_id, Feature::Notifications).await;
            return;
        }

        let reminders = ctx.database.reminders().list_active(message.user_id).await;
        if reminders.is_empty() {
            ctx.reply(message.user_id, "No reminders").await;
            return;
        }

        let zone = ctx.user_zone(message.user_id).await;
        let lines: Vec<String> = reminders
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{}. {} — {}",
                    i + 1,
                    zone.to_local(r.due_at).format("%H:%M"),
                    r.text
                )
            })
            .collect();
        ctx.reply(message.user_id, &lines.join("\n")).await;
    }

    async fn handle_notedel(&self, ctx: &CommandContext, message: &InboundMessage, rest: &str) -> Result<()> {
        if !ctx.feature_enabled(Feature::Notifications).await {
            ctx.reply_disabled(message.user_id, Feature::Notifications).await;
            return Ok(());
        }

        let index = rest
            .split_whitespace()
            .next()
            .filter(|n| n.chars().all(|c| c.is_ascii_digit()))
            .and_then(|n| n.parse::<usize>().ok());
        let Some(index) = index else {
            ctx.reply(message.user_id, "Usage: /notedel N").await;
            return Ok(());
        };

        let deleted = ctx
            .database
            .reminders()
            .delete_by_visible_index(message.user_id, index)
            .await?;
        let reply = if deleted {
            "🗑️ Deleted".to_string()
        } else {
            error_reply(&BotError::NotFound)
        };
        ctx.reply(message.user_id, &reply).await;
        Ok(())
    }
}

/// A bare time expression; the next message becomes the reminder body
pub struct TimeExpressionHandler;

#[async_trait]
impl IntentHandler for TimeExpressionHandler {
    fn name(&self) -> &'static str {
        "time_expression"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let zone = ctx.user_zone(message.user_id).await;
        let Ok(due_at) = parse_time_expression(&message.text, &zone, ctx.now()) else {
            return Ok(Outcome::Skipped);
        };

        let pending = ctx.database.pending();
        if !ctx.feature_enabled(Feature::Notifications).await {
            pending.clear_reminder(message.user_id).await?;
            ctx.reply_disabled(message.user_id, Feature::Notifications).await;
            return Ok(Outcome::Handled);
        }

        pending.set_awaiting_reminder_text(message.user_id, due_at).await?;
        ctx.reply(message.user_id, ASK_FOR_TEXT).await;
        Ok(Outcome::Handled)
    }
}

/// `HH:MM text` committed in one message
///
/// Skips when the time part does not parse, so the message can still fill a
/// pending reminder body.
pub struct InlineReminderHandler;

#[async_trait]
impl IntentHandler for InlineReminderHandler {
    fn name(&self) -> &'static str {
        "inline_reminder"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let Some(caps) = inline_pattern().captures(&message.text) else {
            return Ok(Outcome::Skipped);
        };
        if !ctx.feature_enabled(Feature::Notifications).await {
            ctx.reply_disabled(message.user_id, Feature::Notifications).await;
            return Ok(Outcome::Handled);
        }

        let zone = ctx.user_zone(message.user_id).await;
        let Ok(due_at) = parse_time_expression(&caps[1], &zone, ctx.now()) else {
            debug!("'{}' is not a valid time, falling through", &caps[1]);
            return Ok(Outcome::Skipped);
        };
        commit_reminder(ctx, message.user_id, due_at, caps[2].trim()).await?;
        Ok(Outcome::Handled)
    }
}

/// The body of a reminder whose time arrived in the previous message
pub struct PendingReminderHandler;

#[async_trait]
impl IntentHandler for PendingReminderHandler {
    fn name(&self) -> &'static str {
        "pending_reminder"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let user_id = message.user_id;
        let pending = ctx.database.pending();
        let PendingState::AwaitingReminderText { .. } = pending.get(user_id).await else {
            return Ok(Outcome::Skipped);
        };

        if !ctx.feature_enabled(Feature::Notifications).await {
            let PendingState::AwaitingReminderText { .. } = pending.clear(user_id).await? else {
                return Ok(Outcome::Skipped);
            };
            ctx.reply(user_id, CANCELLED).await;
            return Ok(Outcome::Handled);
        }

        match pending.commit_reminder(user_id, &message.text).await? {
            Some(ReminderCommit::Created(_)) => ctx.reply(user_id, REMINDER_SET).await,
            Some(ReminderCommit::LimitReached { limit }) => {
                info!("User {user_id} hit the reminder cap");
                ctx.reply(user_id, &error_reply(&BotError::LimitExceeded { limit }))
                    .await;
            }
            None => {
                debug!("Pending reminder for user {user_id} already consumed");
                return Ok(Outcome::Skipped);
            }
        }
        Ok(Outcome::Handled)
    }
}
