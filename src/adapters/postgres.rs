//! PostgreSQL state store.
//!
//! One row per tracker instance; the goal list rides along as JSONB so the
//! whole record saves and loads atomically (last writer wins per tick).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::info;

use crate::domain::TrackedGame;
use crate::error::Result;
use crate::tracker::StateStore;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a store from an existing connection pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StateStore for PostgresStore {
    async fn load(&self, tracker_id: &str) -> Result<Option<TrackedGame>> {
        let row = sqlx::query(
            r#"
            SELECT game_id, game_time, events, morning_announced, preview_announced
            FROM tracked_games WHERE id = $1
            "#,
        )
        .bind(tracker_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let events = serde_json::from_value(r.get("events"))?;
            Ok(TrackedGame {
                game_id: r.get::<Option<i64>, _>("game_id"),
                game_start: r.get::<Option<DateTime<Utc>>, _>("game_time"),
                events,
                morning_announced: r.get("morning_announced"),
                preview_announced: r.get("preview_announced"),
            })
        })
        .transpose()
    }

    async fn save(&self, tracker_id: &str, game: &TrackedGame) -> Result<()> {
        let events = serde_json::to_value(&game.events)?;

        sqlx::query(
            r#"
            INSERT INTO tracked_games
                (id, game_id, game_time, events, morning_announced, preview_announced, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (id) DO UPDATE SET
                game_id = EXCLUDED.game_id,
                game_time = EXCLUDED.game_time,
                events = EXCLUDED.events,
                morning_announced = EXCLUDED.morning_announced,
                preview_announced = EXCLUDED.preview_announced,
                updated_at = NOW()
            "#,
        )
        .bind(tracker_id)
        .bind(game.game_id)
        .bind(game.game_start)
        .bind(&events)
        .bind(game.morning_announced)
        .bind(game.preview_announced)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
