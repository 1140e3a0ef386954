//! Append-only transaction ledger

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use super::{Database, StoreDocument, Transaction, UserId};
use crate::core::BotError;

#[derive(Clone)]
pub struct TransactionLedger {
    db: Database,
}

impl TransactionLedger {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn append(
        &self,
        user_id: UserId,
        amount: i64,
        category: &str,
        occurred_at: DateTime<Utc>,
    ) -> Result<Transaction, BotError> {
        let transaction = self
            .db
            .mutate(|doc| Ok(push_transaction(doc, user_id, amount, category, occurred_at)))
            .await?;

        info!("Recorded transaction {amount:+} ({category}) for user {user_id}");
        Ok(transaction)
    }

    /// Newest first, at most `limit`
    pub async fn recent(&self, user_id: UserId, limit: usize) -> Vec<Transaction> {
        let mut items = self.for_user(user_id).await;
        items.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        items.truncate(limit);
        items
    }

    /// Entries with `start <= occurred_at <= end_inclusive`, in insertion order
    pub async fn in_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end_inclusive: DateTime<Utc>,
    ) -> Vec<Transaction> {
        self.db
            .read(|doc| {
                doc.transactions
                    .iter()
                    .filter(|t| {
                        t.user_id == user_id
                            && start <= t.occurred_at
                            && t.occurred_at <= end_inclusive
                    })
                    .cloned()
                    .collect()
            })
            .await
    }

    async fn for_user(&self, user_id: UserId) -> Vec<Transaction> {
        self.db
            .read(|doc| {
                doc.transactions
                    .iter()
                    .filter(|t| t.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .await
    }
}

pub(super) fn push_transaction(
    doc: &mut StoreDocument,
    user_id: UserId,
    amount: i64,
    category: &str,
    occurred_at: DateTime<Utc>,
) -> Transaction {
    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        user_id,
        amount,
        category: category.to_string(),
        occurred_at,
    };
    doc.transactions.push(transaction.clone());
    transaction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap() + Duration::milliseconds(250)
    }

    #[tokio::test]
    async fn test_appended_entry_visible_in_recent_and_point_range() {
        let (_dir, db) = temp_database(10).await;
        let ledger = db.transactions();
        ledger.append(5, 300, "Salary", t0()).await.unwrap();

        let recent = ledger.recent(5, 1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].amount, 300);
        assert_eq!(recent[0].category, "Salary");

        let ranged = ledger.in_range(5, t0(), t0()).await;
        assert_eq!(ranged, recent);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let (_dir, db) = temp_database(10).await;
        let ledger = db.transactions();
        ledger.append(5, -100, "old", t0()).await.unwrap();
        ledger.append(5, -200, "newest", t0() + Duration::hours(2)).await.unwrap();
        ledger.append(5, -300, "middle", t0() + Duration::hours(1)).await.unwrap();
        ledger.append(6, 999, "someone else", t0() + Duration::hours(3)).await.unwrap();

        let cats: Vec<_> = ledger.recent(5, 2).await.into_iter().map(|t| t.category).collect();
        assert_eq!(cats, vec!["newest", "middle"]);
    }

    #[tokio::test]
    async fn test_range_bounds_are_inclusive() {
        let (_dir, db) = temp_database(10).await;
        let ledger = db.transactions();
        ledger.append(5, 1, "before", t0() - Duration::milliseconds(1)).await.unwrap();
        ledger.append(5, 2, "start", t0()).await.unwrap();
        ledger.append(5, 3, "end", t0() + Duration::days(1)).await.unwrap();
        ledger.append(5, 4, "after", t0() + Duration::days(1) + Duration::milliseconds(1)).await.unwrap();

        let cats: Vec<_> = ledger
            .in_range(5, t0(), t0() + Duration::days(1))
            .await
            .into_iter()
            .map(|t| t.category)
            .collect();
        assert_eq!(cats, vec!["start", "end"]);
    }

    #[tokio::test]
    async fn test_millisecond_precision_survives_reload() {
        let (_dir, db) = temp_database(10).await;
        db.transactions().append(5, 10, "Coffee", t0()).await.unwrap();

        let reopened = Database::new(db.path(), 10).await.unwrap();
        let stored = reopened.transactions().recent(5, 10).await;
        assert_eq!(stored[0].occurred_at, t0());
    }
}
