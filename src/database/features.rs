//! Global feature flags

use log::info;

use super::Database;
use crate::core::{BotError, Feature};

#[derive(Clone)]
pub struct FeatureFlags {
    db: Database,
}

impl FeatureFlags {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    /// `false` when the key is absent from the document
    pub async fn get(&self, feature: Feature) -> bool {
        self.db
            .read(|doc| doc.features.get(feature.as_str()).copied().unwrap_or(false))
            .await
    }

    pub async fn set(&self, feature: Feature, enabled: bool) -> Result<(), BotError> {
        self.db
            .mutate(|doc| {
                doc.features.insert(feature.as_str().to_string(), enabled);
                Ok(())
            })
            .await?;
        info!("Feature {feature} set to {enabled}");
        Ok(())
    }

    /// Flip a flag under one lock acquisition; returns the new value
    pub async fn toggle(&self, feature: Feature) -> Result<bool, BotError> {
        let enabled = self
            .db
            .mutate(|doc| {
                let entry = doc
                    .features
                    .entry(feature.as_str().to_string())
                    .or_insert(false);
                *entry = !*entry;
                Ok(*entry)
            })
            .await?;
        info!("Feature {feature} toggled to {enabled}");
        Ok(enabled)
    }
}
