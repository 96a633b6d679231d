//! NHL web API adapter.
//!
//! Two logical endpoints: schedule-by-date and gamecenter landing (box
//! score). Everything under `summary.scoring` is optional — a box score
//! without it means the game has not produced data yet, not an error.
//! Retry policy lives in the poller, not here.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{HowlerError, Result};
use crate::tracker::ScheduleSource;

pub const DEFAULT_NHL_API_BASE: &str = "https://api-web.nhle.com/v1";

/// Thin reqwest client against the NHL web API
#[derive(Clone)]
pub struct NhlClient {
    http: Client,
    base_url: String,
}

impl NhlClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent("howler/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");
        let resp = self.http.get(&url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ScheduleSource for NhlClient {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let raw = self.get_json(&format!("/schedule/{date_str}")).await?;
        let payload: SchedulePayload = serde_json::from_value(raw)
            .map_err(|e| HowlerError::MalformedPayload(format!("schedule: {e}")))?;

        if payload.game_week.is_empty() {
            return Err(HowlerError::MalformedPayload(
                "schedule: gameWeek is empty".to_string(),
            ));
        }

        // The week payload covers several days; take the requested one,
        // falling back to the leading entry like the provider does.
        let day = payload
            .game_week
            .iter()
            .find(|d| d.date.as_deref() == Some(date_str.as_str()))
            .unwrap_or(&payload.game_week[0]);

        Ok(day.games.clone())
    }

    async fn fetch_box_score(&self, game_id: i64) -> Result<BoxScore> {
        let raw = self.get_json(&format!("/gamecenter/{game_id}/landing")).await?;
        serde_json::from_value(raw)
            .map_err(|e| HowlerError::MalformedPayload(format!("box score {game_id}: {e}")))
    }
}

// ==================== Wire models ====================

#[derive(Debug, Deserialize)]
struct SchedulePayload {
    #[serde(rename = "gameWeek")]
    game_week: Vec<ScheduleDay>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDay {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub id: i64,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: DateTime<Utc>,
    pub home_team: ScheduledTeam,
    pub away_team: ScheduledTeam,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTeam {
    pub abbrev: String,
    #[serde(default)]
    pub place_name: LocalizedText,
}

/// Gamecenter landing payload. Only `id` is required; the summary block
/// appears once the provider publishes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxScore {
    pub id: i64,
    #[serde(default)]
    pub game_state: Option<String>,
    #[serde(default)]
    pub home_team: Option<BoxTeam>,
    #[serde(default)]
    pub away_team: Option<BoxTeam>,
    #[serde(default)]
    pub summary: Option<GameSummary>,
}

impl BoxScore {
    /// Terminal statuses after which the provider stops appending goals
    pub fn is_final(&self) -> bool {
        matches!(self.game_state.as_deref(), Some("FINAL") | Some("OFF"))
    }

    pub fn home_abbrev(&self) -> &str {
        self.home_team.as_ref().map(|t| t.abbrev.as_str()).unwrap_or("HOME")
    }

    pub fn away_abbrev(&self) -> &str {
        self.away_team.as_ref().map(|t| t.abbrev.as_str()).unwrap_or("AWAY")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxTeam {
    pub abbrev: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(default)]
    pub scoring: Vec<ScoringPeriod>,
    #[serde(default)]
    pub three_stars: Vec<StarPerformer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPeriod {
    #[serde(default)]
    pub period_descriptor: Option<PeriodDescriptor>,
    #[serde(default)]
    pub goals: Vec<GoalEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodDescriptor {
    pub number: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEntry {
    #[serde(default)]
    pub first_name: MaybeLocalized,
    #[serde(default)]
    pub last_name: MaybeLocalized,
    #[serde(default)]
    pub team_abbrev: MaybeLocalized,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    #[serde(default)]
    pub goals_to_date: Option<u32>,
    #[serde(default)]
    pub headshot: Option<String>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub time_in_period: Option<String>,
    #[serde(default)]
    pub assists: Vec<AssistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistEntry {
    #[serde(default)]
    pub name: Option<MaybeLocalized>,
    #[serde(default)]
    pub first_name: Option<MaybeLocalized>,
    #[serde(default)]
    pub last_name: Option<MaybeLocalized>,
}

impl AssistEntry {
    pub fn display_name(&self, locale: &str) -> String {
        if let Some(name) = &self.name {
            let resolved = name.resolve(locale);
            if !resolved.is_empty() {
                return resolved.to_string();
            }
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => {
                format!("{} {}", first.resolve(locale), last.resolve(locale))
            }
            (Some(first), None) => first.resolve(locale).to_string(),
            (None, Some(last)) => last.resolve(locale).to_string(),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarPerformer {
    #[serde(default)]
    pub star: Option<u8>,
    #[serde(default)]
    pub name: Option<MaybeLocalized>,
    #[serde(default)]
    pub first_name: Option<MaybeLocalized>,
    #[serde(default)]
    pub last_name: Option<MaybeLocalized>,
    #[serde(default)]
    pub team_abbrev: Option<String>,
    #[serde(default)]
    pub goals: Option<u32>,
    #[serde(default)]
    pub assists: Option<u32>,
    #[serde(default)]
    pub points: Option<u32>,
}

/// Name field localized by language key, e.g. `{"default": "...", "fr": …}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub default: String,
    #[serde(flatten)]
    pub other: HashMap<String, String>,
}

impl LocalizedText {
    /// Ordered fallback lookup: preferred locale, then the provider default.
    pub fn resolve(&self, preferred: &str) -> &str {
        self.other
            .get(preferred)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default)
    }
}

/// The provider has shipped these fields both as plain strings and as
/// localized objects across API revisions; accept either shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeLocalized {
    Plain(String),
    Localized(LocalizedText),
}

impl Default for MaybeLocalized {
    fn default() -> Self {
        MaybeLocalized::Plain(String::new())
    }
}

impl MaybeLocalized {
    pub fn resolve(&self, preferred: &str) -> &str {
        match self {
            MaybeLocalized::Plain(s) => s,
            MaybeLocalized::Localized(t) => t.resolve(preferred),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn localized_text_prefers_requested_locale() {
        let text: LocalizedText =
            serde_json::from_value(json!({"default": "Coyotes", "fr": "Les Coyotes"})).unwrap();
        assert_eq!(text.resolve("fr"), "Les Coyotes");
        assert_eq!(text.resolve("cs"), "Coyotes");
    }

    #[test]
    fn maybe_localized_accepts_both_shapes() {
        let plain: MaybeLocalized = serde_json::from_value(json!("ARI")).unwrap();
        assert_eq!(plain.resolve("en"), "ARI");

        let localized: MaybeLocalized =
            serde_json::from_value(json!({"default": "ARI"})).unwrap();
        assert_eq!(localized.resolve("en"), "ARI");
    }

    #[test]
    fn box_score_without_summary_parses() {
        let b: BoxScore =
            serde_json::from_value(json!({"id": 2023020001, "gameState": "FUT"})).unwrap();
        assert!(b.summary.is_none());
        assert!(!b.is_final());
    }

    #[test]
    fn box_score_missing_id_is_rejected() {
        let res: std::result::Result<BoxScore, _> =
            serde_json::from_value(json!({"gameState": "LIVE"}));
        assert!(res.is_err());
    }

    #[test]
    fn final_states_are_terminal() {
        for state in ["FINAL", "OFF"] {
            let b: BoxScore =
                serde_json::from_value(json!({"id": 1, "gameState": state})).unwrap();
            assert!(b.is_final());
        }
        let b: BoxScore = serde_json::from_value(json!({"id": 1, "gameState": "LIVE"})).unwrap();
        assert!(!b.is_final());
    }
}
