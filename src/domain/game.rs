use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single persisted record for the tracker.
///
/// The poller reloads this at the start of every tick and never carries a
/// copy across ticks; the store is the only source of truth. Invariant:
/// every entry in `events` has already been handed to the chat sink at a
/// prior tick (notify happens before persist within a tick).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedGame {
    /// Provider's game id; `None` means no game tracked today
    pub game_id: Option<i64>,
    /// Scheduled puck drop, UTC
    pub game_start: Option<DateTime<Utc>>,
    /// Goals notified so far, in chronological order as reported
    #[serde(default)]
    pub events: Vec<ScoringEvent>,
    /// Set once the daily schedule lookup has run (announced or not)
    #[serde(default)]
    pub morning_announced: bool,
    /// Set once the pre-game preview has been posted
    #[serde(default)]
    pub preview_announced: bool,
}

impl TrackedGame {
    pub fn has_game(&self) -> bool {
        self.game_id.is_some()
    }

    /// Drop the tracked game but keep the daily announcement flags, so a
    /// finished game does not re-trigger discovery until the next reset.
    pub fn clear_game(&mut self) {
        self.game_id = None;
        self.game_start = None;
        self.events.clear();
    }
}

/// One goal as extracted from a box score. Identity is positional: the
/// provider appends during normal play, so sequences are compared by
/// length, never by content hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    pub team_abbrev: String,
    pub period: u8,
    #[serde(default)]
    pub time_in_period: Option<String>,
    pub home_score: u32,
    pub away_score: u32,
    pub scorer_first_name: String,
    pub scorer_last_name: String,
    #[serde(default)]
    pub assists: Vec<String>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub goals_to_date: Option<u32>,
    #[serde(default)]
    pub headshot_url: Option<String>,
}

impl ScoringEvent {
    pub fn scorer_name(&self) -> String {
        format!("{} {}", self.scorer_first_name, self.scorer_last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_game_keeps_daily_flags() {
        let mut game = TrackedGame {
            game_id: Some(2023020001),
            game_start: Some(Utc::now()),
            events: vec![],
            morning_announced: true,
            preview_announced: true,
        };
        game.clear_game();
        assert!(!game.has_game());
        assert!(game.game_start.is_none());
        assert!(game.morning_announced);
        assert!(game.preview_announced);
    }
}
