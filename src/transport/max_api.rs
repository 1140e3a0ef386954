//! Max Bot API client
//!
//! Outbound effects go through `POST /messages` and `POST /answers`; the
//! long-poll source reads `GET /updates` and feeds the conversation engine.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use super::outbound::{Attachment, Outbound, OutgoingMessage};
use super::update::Update;
use crate::commands::ConversationEngine;
use crate::database::UserId;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct MaxApiClient {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
}

/// Body of a successful `GET /updates`
#[derive(Debug, Deserialize)]
pub struct UpdatesPage {
    #[serde(default)]
    pub updates: Vec<Value>,
    #[serde(default)]
    pub marker: Option<i64>,
}

pub enum PollOutcome {
    Page(UpdatesPage),
    /// Non-200 answer; carries the status and the start of the body
    Rejected { status: u16, body: String },
}

impl MaxApiClient {
    pub fn new(api_base: &str, access_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub async fn get_updates(&self, marker: Option<i64>, timeout: Duration) -> Result<PollOutcome> {
        let mut query = vec![("timeout", timeout.as_secs().to_string())];
        if let Some(marker) = marker {
            query.push(("marker", marker.to_string()));
        }
        debug!("Long polling with {query:?}");

        let response = self
            .client
            .get(self.url("/updates"))
            .header("Authorization", &self.access_token)
            .query(&query)
            // server holds the request for `timeout`; leave headroom on top
            .timeout(timeout + Duration::from_secs(5))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(PollOutcome::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(PollOutcome::Page(response.json().await?))
    }

    async fn post(&self, path: &str, query: &[(&str, String)], body: Value) -> Result<()> {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", &self.access_token)
            .query(query)
            .json(&body)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{path} failed ({status}): {body}");
        }
        Ok(())
    }
}

#[async_trait]
impl Outbound for MaxApiClient {
    async fn send_reply(&self, user_id: UserId, text: &str, attachments: Option<Vec<Attachment>>) {
        let mut body = json!({ "text": text });
        if let Some(attachments) = attachments {
            body["attachments"] = json!(attachments);
        }
        match self
            .post("/messages", &[("user_id", user_id.to_string())], body)
            .await
        {
            Ok(()) => info!("📤 Message sent to user {user_id}"),
            Err(e) => warn!("⚠️ send_reply to user {user_id} failed: {e}"),
        }
    }

    async fn answer_interactive(
        &self,
        callback_id: &str,
        message: Option<OutgoingMessage>,
        notification: Option<String>,
    ) {
        let mut body = json!({});
        if let Some(message) = message {
            body["message"] = json!(message);
        }
        if let Some(notification) = notification {
            body["notification"] = json!(notification);
        }
        match self
            .post("/answers", &[("callback_id", callback_id.to_string())], body)
            .await
        {
            Ok(()) => info!("📤 Callback {callback_id} answered"),
            Err(e) => warn!("⚠️ answer_interactive for {callback_id} failed: {e}"),
        }
    }
}

/// Long-poll `GET /updates` forever, handing each update to the engine
///
/// The marker advances only after a non-empty batch. A rejected poll waits
/// one second and a transport error two before retrying.
pub async fn run_long_poll(client: Arc<MaxApiClient>, engine: Arc<ConversationEngine>, timeout: Duration) {
    let mut marker: Option<i64> = None;
    info!("Long polling started (timeout: {}s)", timeout.as_secs());

    loop {
        match client.get_updates(marker, timeout).await {
            Ok(PollOutcome::Page(page)) => {
                info!("📥 Received {} updates (marker={:?})", page.updates.len(), page.marker);
                if page.updates.is_empty() {
                    continue;
                }
                for raw in page.updates {
                    dispatch_raw(&engine, raw).await;
                }
                if page.marker.is_some() {
                    marker = page.marker;
                }
            }
            Ok(PollOutcome::Rejected { status, body }) => {
                warn!("Long poll returned {status}: {body}");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(e) => {
                error!("Long poll error: {e}");
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

async fn dispatch_raw(engine: &ConversationEngine, raw: Value) {
    let update = match serde_json::from_value::<Update>(raw) {
        Ok(update) => update,
        Err(e) => {
            warn!("Skipping malformed update: {e}");
            return;
        }
    };
    if let Err(e) = engine.handle_update(update).await {
        error!("Error handling update: {e:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = MaxApiClient::new("https://platform-api.max.ru/", "token").unwrap();
        assert_eq!(client.url("/messages"), "https://platform-api.max.ru/messages");
    }

    #[test]
    fn test_updates_page_defaults() {
        let page: UpdatesPage = serde_json::from_str("{}").unwrap();
        assert!(page.updates.is_empty());
        assert_eq!(page.marker, None);

        let page: UpdatesPage =
            serde_json::from_str(r#"{"updates": [{"update_type": "x"}], "marker": 17}"#).unwrap();
        assert_eq!(page.updates.len(), 1);
        assert_eq!(page.marker, Some(17));
    }
}
