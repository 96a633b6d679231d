//! Capability boundaries of the tracker: the data provider, the durable
//! store, and the chat sink. Adapters implement these; tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::adapters::nhl::{BoxScore, ScheduledGame};
use crate::domain::TrackedGame;
use crate::error::Result;

/// Schedule and box-score lookups against the external provider
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>>;

    async fn fetch_box_score(&self, game_id: i64) -> Result<BoxScore>;
}

/// Durability boundary for the tracked-game record
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, tracker_id: &str) -> Result<Option<TrackedGame>>;

    async fn save(&self, tracker_id: &str, game: &TrackedGame) -> Result<()>;
}

/// Chat transport; content is short text or a title/description/fields/
/// thumbnail card
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn post_text(&self, text: &str) -> Result<()>;

    async fn post_card(&self, card: &MessageCard) -> Result<()>;
}

/// Rendered rich message, transport-agnostic
#[derive(Debug, Clone, Default)]
pub struct MessageCard {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<(String, String)>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}
