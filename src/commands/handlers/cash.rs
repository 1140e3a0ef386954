//! Ledger handlers
//!
//! Handles: cash, plus inline `+300 Category` entries and the category that
//! follows a bare amount
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Accept date ranges in /cash
//! - 1.0.0: Initial ledger commands

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::commands::context::CommandContext;
use crate::commands::handler::{InboundMessage, IntentHandler, Outcome};
use crate::commands::handlers::split_command;
use crate::core::{BotError, Feature};
use crate::database::PendingState;
use crate::features::ledger::{format_amount, format_ledger, parse_cash_query, CashQuery};

const ASK_FOR_CATEGORY: &str = "Enter a category (e.g. \"Side job\" or \"Groceries\")";
const CANCELLED: &str = "💸 Transactions are disabled, transaction cancelled";

fn inline_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-])(\d+)(?:\s+(.+))?$").expect("transaction pattern is valid")
    })
}

async fn commit_transaction(ctx: &CommandContext, user_id: i64, amount: i64, category: &str) -> Result<()> {
    ctx.database
        .transactions()
        .append(user_id, amount, category, ctx.now())
        .await?;
    ctx.reply(user_id, &recorded_reply(amount, category)).await;
    Ok(())
}

fn recorded_reply(amount: i64, category: &str) -> String {
    format!("✅ Transaction recorded: {} ({category})", format_amount(amount))
}

/// Handler for `/cash [period]`
pub struct CashHandler;

#[async_trait]
impl IntentHandler for CashHandler {
    fn name(&self) -> &'static str {
        "cash"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let (head, rest) = split_command(&message.text);
        if !head.starts_with("/cash") {
            return Ok(Outcome::Skipped);
        }
        let user_id = message.user_id;
        if !ctx.feature_enabled(Feature::Transactions).await {
            ctx.reply_disabled(user_id, Feature::Transactions).await;
            return Ok(Outcome::Handled);
        }

        let zone = ctx.user_zone(user_id).await;
        let ledger = ctx.database.transactions();
        let entries = match parse_cash_query(Some(rest), &zone, ctx.now()) {
            Ok(CashQuery::Recent { limit }) => ledger.recent(user_id, limit).await,
            Ok(CashQuery::Range { start, end }) => {
                let mut entries = ledger.in_range(user_id, start, end).await;
                entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
                entries
            }
            Err(BotError::InvalidFormat(usage)) => {
                ctx.reply(user_id, &format!("Invalid format. Examples: {usage}")).await;
                return Ok(Outcome::Handled);
            }
            Err(e) => return Err(e.into()),
        };

        if entries.is_empty() {
            ctx.reply(user_id, "No transactions").await;
        } else {
            ctx.reply(user_id, &format_ledger(&entries, &zone)).await;
        }
        Ok(Outcome::Handled)
    }
}

/// `+300 Category` records at once; a bare `+300` waits for the category
pub struct InlineTransactionHandler;

#[async_trait]
impl IntentHandler for InlineTransactionHandler {
    fn name(&self) -> &'static str {
        "inline_transaction"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let Some(caps) = inline_pattern().captures(&message.text) else {
            return Ok(Outcome::Skipped);
        };
        let Ok(magnitude) = caps[2].parse::<i64>() else {
            debug!("Amount '{}' out of range, not a transaction", &caps[2]);
            return Ok(Outcome::Skipped);
        };
        let amount = if &caps[1] == "-" { -magnitude } else { magnitude };

        let user_id = message.user_id;
        let pending = ctx.database.pending();
        if !ctx.feature_enabled(Feature::Transactions).await {
            pending.clear_transaction(user_id).await?;
            ctx.reply_disabled(user_id, Feature::Transactions).await;
            return Ok(Outcome::Handled);
        }

        match caps.get(3).map(|c| c.as_str().trim()) {
            Some(category) if !category.is_empty() => {
                commit_transaction(ctx, user_id, amount, category).await?;
            }
            _ => {
                pending.set_awaiting_transaction_category(user_id, amount).await?;
                ctx.reply(user_id, ASK_FOR_CATEGORY).await;
            }
        }
        Ok(Outcome::Handled)
    }
}

/// The whole message is the category for a pending amount
pub struct PendingCategoryHandler;

#[async_trait]
impl IntentHandler for PendingCategoryHandler {
    fn name(&self) -> &'static str {
        "pending_category"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let user_id = message.user_id;
        let pending = ctx.database.pending();
        let PendingState::AwaitingTransactionCategory { .. } = pending.get(user_id).await else {
            return Ok(Outcome::Skipped);
        };

        if !ctx.feature_enabled(Feature::Transactions).await {
            let PendingState::AwaitingTransactionCategory { .. } = pending.clear(user_id).await? else {
                return Ok(Outcome::Skipped);
            };
            ctx.reply(user_id, CANCELLED).await;
            return Ok(Outcome::Handled);
        }

        match pending.commit_transaction(user_id, &message.text, ctx.now()).await? {
            Some(transaction) => {
                ctx.reply(user_id, &recorded_reply(transaction.amount, &transaction.category))
                    .await;
                Ok(Outcome::Handled)
            }
            None => {
                debug!("Pending amount for user {user_id} already consumed");
                Ok(Outcome::Skipped)
            }
        }
    }
}
