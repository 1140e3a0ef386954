//! # Database
//!
//! Single JSON document holding every collection the bot persists. The
//! document is loaded once at startup and rewritten in full after each
//! mutation.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Replace the SQLite store with a write-through JSON document
//! - 1.0.0: Initial release

pub mod document;
pub mod features;
pub mod pending;
pub mod reminders;
pub mod timezones;
pub mod transactions;

pub use document::{Reminder, StoreDocument, Transaction, UserId};
pub use features::FeatureFlags;
pub use pending::{PendingInputs, PendingState, ReminderCommit};
pub use reminders::ReminderRegistry;
pub use timezones::UserTimezones;
pub use transactions::TransactionLedger;

use crate::core::BotError;
use log::{debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handle to the shared store; clones share one document and one lock
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    max_reminders_per_user: usize,
    document: RwLock<StoreDocument>,
}

impl Database {
    /// Open the store at `path`
    ///
    /// A missing or unreadable document yields a fresh default document; only
    /// failing to create the parent directory is an error.
    pub async fn new(path: impl AsRef<Path>, max_reminders_per_user: usize) -> Result<Self, BotError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let document = Self::load(&path);
        info!(
            "Store opened at {} ({} reminders, {} transactions)",
            path.display(),
            document.reminders.len(),
            document.transactions.len()
        );

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                max_reminders_per_user,
                document: RwLock::new(document),
            }),
        })
    }

    fn load(path: &Path) -> StoreDocument {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No readable store at {}: {e}; starting empty", path.display());
                return StoreDocument::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                warn!("Store at {} is corrupt ({e}); starting empty", path.display());
                StoreDocument::default()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn max_reminders_per_user(&self) -> usize {
        self.inner.max_reminders_per_user
    }

    pub fn reminders(&self) -> ReminderRegistry {
        ReminderRegistry::new(self.clone())
    }

    pub fn transactions(&self) -> TransactionLedger {
        TransactionLedger::new(self.clone())
    }

    pub fn features(&self) -> FeatureFlags {
        FeatureFlags::new(self.clone())
    }

    pub fn pending(&self) -> PendingInputs {
        PendingInputs::new(self.clone())
    }

    pub fn timezones(&self) -> UserTimezones {
        UserTimezones::new(self.clone())
    }

    /// Run `f` against a consistent view of the document
    pub async fn read<T>(&self, f: impl FnOnce(&StoreDocument) -> T) -> T {
        let guard = self.inner.document.read().await;
        f(&guard)
    }

    /// Copy of the whole document
    pub async fn snapshot(&self) -> StoreDocument {
        self.read(StoreDocument::clone).await
    }

    /// Apply `f` under the exclusive lock and persist the result
    ///
    /// `f` edits a draft. The draft replaces the live document only after it
    /// has been written to disk, so memory never runs ahead of the durable
    /// copy. An `Err` from `f` or an unchanged draft skips the write.
    pub async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<T, BotError>,
    ) -> Result<T, BotError> {
        let mut guard = self.inner.document.write().await;
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        if draft != *guard {
            self.persist(&draft).await?;
            *guard = draft;
        }
        Ok(value)
    }

    /// Write the document on the blocking pool; the caller keeps the lock
    async fn persist(&self, document: &StoreDocument) -> Result<(), BotError> {
        let json = serde_json::to_string_pretty(document)?;
        let path = self.inner.path.clone();
        let written = json.len();
        tokio::task::spawn_blocking(move || write_atomically(&path, json.as_bytes()))
            .await
            .map_err(|e| BotError::Storage(std::io::Error::new(std::io::ErrorKind::Other, e)))??;
        debug!("Store persisted ({written} bytes)");
        Ok(())
    }
}

/// Write-temp-then-rename so a crash never leaves a truncated document
fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp_path = temp_path_for(path);
    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;

    /// Fresh store in its own temp dir; keep the dir alive for the test
    pub async fn temp_database(max_per_user: usize) -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("storage.json"), max_per_user)
            .await
            .unwrap();
        (dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_database;
    use super::*;
    use crate::core::Feature;

    #[tokio::test]
    async fn test_missing_file_starts_with_default_flags() {
        let (_dir, db) = temp_database(10).await;
        let doc = db.snapshot().await;
        assert!(doc.reminders.is_empty());
        assert_eq!(doc.features.get("notifications"), Some(&true));
        assert_eq!(doc.features.get("transactions"), Some(&true));
        // nothing is written until the first mutation
        assert!(!db.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_replaced_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let db = Database::new(&path, 10).await.unwrap();
        assert_eq!(db.snapshot().await, StoreDocument::default());
    }

    #[tokio::test]
    async fn test_mutation_is_written_through() {
        let (_dir, db) = temp_database(10).await;
        db.timezones().set(42, "UTC+5").await.unwrap();

        let reopened = Database::new(db.path(), 10).await.unwrap();
        assert_eq!(reopened.timezones().get(42).await.as_deref(), Some("UTC+5"));
        assert!(!temp_path_for(db.path()).exists());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_document_untouched() {
        let (_dir, db) = temp_database(10).await;
        let before = db.snapshot().await;

        let result: Result<(), BotError> = db
            .mutate(|doc| {
                doc.user_timezones.insert("1".into(), "UTC".into());
                Err(BotError::NotFound)
            })
            .await;

        assert!(matches!(result, Err(BotError::NotFound)));
        assert_eq!(db.snapshot().await, before);
        assert!(!db.path().exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_write_failure_keeps_memory_in_sync_with_disk() {
        let (_dir, db) = temp_database(10).await;
        db.timezones().set(1, "UTC+1").await.unwrap();

        // a non-empty directory in place of the document blocks the rename
        std::fs::remove_file(db.path()).unwrap();
        std::fs::create_dir(db.path()).unwrap();
        std::fs::write(db.path().join("blocker"), b"").unwrap();

        let result = db.timezones().set(1, "UTC+2").await;
        assert!(matches!(result, Err(BotError::Storage(_))));
        assert_eq!(db.timezones().get(1).await.as_deref(), Some("UTC+1"));

        // the lock was released and readers on other tasks still get through
        let reader = db.clone();
        let seen = tokio::spawn(async move { reader.timezones().get(1).await })
            .await
            .unwrap();
        assert_eq!(seen.as_deref(), Some("UTC+1"));
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("storage.json");
        let db = Database::new(&path, 10).await.unwrap();
        db.features().set(Feature::Transactions, false).await.unwrap();
        assert!(path.exists());
    }
}
