//! Discord webhook sink.
//!
//! Posts plain text or embed cards to a channel webhook. The notifier
//! treats failures here as best-effort: they are logged by the caller and
//! never roll back persisted state.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{HowlerError, Result};
use crate::tracker::{ChatSink, MessageCard};

#[derive(Clone)]
pub struct DiscordWebhook {
    client: Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed>,
}

#[derive(Serialize)]
struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField>,
}

#[derive(Serialize)]
struct EmbedImage {
    url: String,
}

#[derive(Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

impl DiscordWebhook {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> Result<()> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| HowlerError::Notification(e.to_string()))?;

        if resp.status().is_success() {
            debug!("webhook delivered");
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(HowlerError::Notification(format!("HTTP {status}: {body}")))
        }
    }
}

#[async_trait]
impl ChatSink for DiscordWebhook {
    async fn post_text(&self, text: &str) -> Result<()> {
        self.post(&WebhookPayload {
            content: Some(text),
            embeds: Vec::new(),
        })
        .await
    }

    async fn post_card(&self, card: &MessageCard) -> Result<()> {
        let embed = Embed {
            title: Some(card.title.clone()),
            description: card.description.clone(),
            timestamp: card.timestamp.map(|t| t.to_rfc3339()),
            thumbnail: card.thumbnail_url.clone().map(|url| EmbedImage { url }),
            image: card.image_url.clone().map(|url| EmbedImage { url }),
            fields: card
                .fields
                .iter()
                .map(|(name, value)| EmbedField {
                    name: name.clone(),
                    value: value.clone(),
                    inline: true,
                })
                .collect(),
        };

        self.post(&WebhookPayload {
            content: None,
            embeds: vec![embed],
        })
        .await
    }
}
