//! Per-user pending input slot
//!
//! The document keeps reminder and transaction slots in separate maps. Setting
//! either kind clears the other, so a user has at most one pending input.

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::document::user_key;
use super::reminders::push_reminder;
use super::transactions::push_transaction;
use super::{Database, Reminder, StoreDocument, Transaction, UserId};
use crate::core::BotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    None,
    /// A bare time was received; the next message is the reminder body
    AwaitingReminderText { due_at: DateTime<Utc> },
    /// An amount was received; the next message is the category
    AwaitingTransactionCategory { amount: i64 },
}

/// What consuming a pending reminder slot produced
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderCommit {
    Created(Reminder),
    LimitReached { limit: usize },
}

#[derive(Clone)]
pub struct PendingInputs {
    db: Database,
}

impl PendingInputs {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn set_awaiting_reminder_text(
        &self,
        user_id: UserId,
        due_at: DateTime<Utc>,
    ) -> Result<(), BotError> {
        let key = user_key(user_id);
        self.db
            .mutate(|doc| {
                doc.pending_transactions.remove(&key);
                doc.pending.insert(key, to_epoch_seconds(due_at));
                Ok(())
            })
            .await?;
        debug!("User {user_id} now awaiting reminder text for {due_at}");
        Ok(())
    }

    pub async fn set_awaiting_transaction_category(
        &self,
        user_id: UserId,
        amount: i64,
    ) -> Result<(), BotError> {
        let key = user_key(user_id);
        self.db
            .mutate(|doc| {
                doc.pending.remove(&key);
                doc.pending_transactions.insert(key, amount);
                Ok(())
            })
            .await?;
        debug!("User {user_id} now awaiting category for {amount:+}");
        Ok(())
    }

    /// Clear both slot kinds, returning whatever was pending
    ///
    /// Only the caller that receives a non-empty state owns the slot.
    pub async fn clear(&self, user_id: UserId) -> Result<PendingState, BotError> {
        let key = user_key(user_id);
        self.db
            .mutate(|doc| {
                let state = slot(doc, &key);
                doc.pending.remove(&key);
                doc.pending_transactions.remove(&key);
                Ok(state)
            })
            .await
    }

    pub async fn clear_reminder(&self, user_id: UserId) -> Result<(), BotError> {
        let key = user_key(user_id);
        self.db
            .mutate(|doc| {
                doc.pending.remove(&key);
                Ok(())
            })
            .await
    }

    pub async fn clear_transaction(&self, user_id: UserId) -> Result<(), BotError> {
        let key = user_key(user_id);
        self.db
            .mutate(|doc| {
                doc.pending_transactions.remove(&key);
                Ok(())
            })
            .await
    }

    /// Current slot; a reminder slot wins if a legacy document holds both
    pub async fn get(&self, user_id: UserId) -> PendingState {
        let key = user_key(user_id);
        self.db.read(|doc| slot(doc, &key)).await
    }

    pub async fn reminder(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        let key = user_key(user_id);
        self.db
            .read(|doc| doc.pending.get(&key).copied())
            .await
            .and_then(from_epoch_seconds)
    }

    pub async fn transaction_amount(&self, user_id: UserId) -> Option<i64> {
        let key = user_key(user_id);
        self.db
            .read(|doc| doc.pending_transactions.get(&key).copied())
            .await
    }

    /// Remove the pending amount and record it under `category` in one write
    ///
    /// `None` when no amount was pending, including when a concurrent message
    /// already consumed it.
    pub async fn commit_transaction(
        &self,
        user_id: UserId,
        category: &str,
        occurred_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, BotError> {
        let key = user_key(user_id);
        let committed = self
            .db
            .mutate(|doc| {
                let Some(amount) = doc.pending_transactions.remove(&key) else {
                    return Ok(None);
                };
                Ok(Some(push_transaction(doc, user_id, amount, category, occurred_at)))
            })
            .await?;

        if let Some(transaction) = &committed {
            info!(
                "Recorded pending transaction {:+} ({category}) for user {user_id}",
                transaction.amount
            );
        }
        Ok(committed)
    }

    /// Remove the pending due time and create the reminder in one write
    ///
    /// The slot is consumed even when the user is at the reminder cap.
    pub async fn commit_reminder(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<Option<ReminderCommit>, BotError> {
        let key = user_key(user_id);
        let limit = self.db.max_reminders_per_user();
        let committed = self
            .db
            .mutate(|doc| {
                let Some(due_at) = doc.pending.remove(&key).and_then(from_epoch_seconds) else {
                    return Ok(None);
                };
                match push_reminder(doc, user_id, due_at, text, limit) {
                    Ok(reminder) => Ok(Some(ReminderCommit::Created(reminder))),
                    Err(BotError::LimitExceeded { limit }) => {
                        Ok(Some(ReminderCommit::LimitReached { limit }))
                    }
                    Err(e) => Err(e),
                }
            })
            .await?;

        if let Some(ReminderCommit::Created(reminder)) = &committed {
            info!(
                "Created pending reminder {} for user {user_id} due {}",
                reminder.id, reminder.due_at
            );
        }
        Ok(committed)
    }
}

fn slot(doc: &StoreDocument, key: &str) -> PendingState {
    if let Some(due_at) = doc.pending.get(key).copied().and_then(from_epoch_seconds) {
        return PendingState::AwaitingReminderText { due_at };
    }
    match doc.pending_transactions.get(key).copied() {
        Some(amount) => PendingState::AwaitingTransactionCategory { amount },
        None => PendingState::None,
    }
}

fn to_epoch_seconds(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / 1000.0
}

fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}
