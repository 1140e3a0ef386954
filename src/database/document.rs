//! Durable document shape
//!
//! Object keys are part of the on-disk contract: `reminders`, `pending`,
//! `user_timezones`, `transactions`, `pending_transactions`, `features`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::Feature;

pub type UserId = i64;

/// Scheduled reminder; `sent` doubles as the soft-delete marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: UserId,
    #[serde(rename = "time", with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
    pub text: String,
    #[serde(default)]
    pub sent: bool,
}

/// Ledger entry; positive amounts are income, negative are expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: UserId,
    pub amount: i64,
    pub category: String,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub occurred_at: DateTime<Utc>,
}

/// Every collection keyed per user uses the decimal user id as the key.
///
/// Field-level defaults keep documents written by older versions loadable.
/// A document missing `features` loads with no flags set, so every flag reads
/// `false`; only a freshly created document starts with both flags on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub reminders: Vec<Reminder>,

    /// Pending reminder due instants, UTC epoch seconds
    #[serde(default)]
    pub pending: BTreeMap<String, f64>,

    #[serde(default)]
    pub user_timezones: BTreeMap<String, String>,

    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// Pending transaction amounts awaiting a category
    #[serde(default)]
    pub pending_transactions: BTreeMap<String, i64>,

    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            reminders: Vec::new(),
            pending: BTreeMap::new(),
            user_timezones: BTreeMap::new(),
            transactions: Vec::new(),
            pending_transactions: BTreeMap::new(),
            features: Feature::ALL
                .iter()
                .map(|f| (f.as_str().to_string(), true))
                .collect(),
        }
    }
}

pub(crate) fn user_key(user_id: UserId) -> String {
    user_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reads_legacy_document() {
        let json = r#"{
          "reminders": [
            {"id": "a1", "user_id": 7, "time": 1741600800000, "text": "Feed the cat", "sent": false}
          ],
          "pending": {"7": 1741604400.0},
          "user_timezones": {"7": "UTC+3"},
          "transactions": [
            {"id": "t1", "user_id": 7, "amount": -200, "category": "Taxi", "timestamp": 1741600800123}
          ],
          "pending_transactions": {"8": 300},
          "features": {"notifications": true, "transactions": false}
        }"#;
        let doc: StoreDocument = serde_json::from_str(json).unwrap();

        assert_eq!(doc.reminders[0].due_at, Utc.timestamp_millis_opt(1741600800000).unwrap());
        assert_eq!(doc.transactions[0].occurred_at.timestamp_subsec_millis(), 123);
        assert_eq!(doc.pending_transactions.get("8"), Some(&300));
        assert_eq!(doc.features.get("transactions"), Some(&false));
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let doc: StoreDocument = serde_json::from_str(r#"{"reminders": []}"#).unwrap();
        assert!(doc.features.is_empty());
        assert!(doc.user_timezones.is_empty());
    }

    #[test]
    fn test_serialized_keys_match_contract() {
        let value = serde_json::to_value(StoreDocument::default()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "features",
                "pending",
                "pending_transactions",
                "reminders",
                "transactions",
                "user_timezones"
            ]
        );
    }

    #[test]
    fn test_reminder_fields_use_durable_names() {
        let reminder = Reminder {
            id: "r".into(),
            user_id: 1,
            due_at: Utc.timestamp_millis_opt(1_000).unwrap(),
            text: "x".into(),
            sent: false,
        };
        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["time"], 1_000);
        assert!(value.get("due_at").is_none());
    }
}
