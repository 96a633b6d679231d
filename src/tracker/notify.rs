//! Renders game-day, goal, preview, and final-summary messages and hands
//! them to the chat sink. Delivery is best-effort: a sink failure is
//! logged and swallowed, never allowed to roll back persisted state.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::domain::ScoringEvent;
use crate::tracker::extract::TopPerformer;
use crate::tracker::traits::{ChatSink, MessageCard};

const GAME_DAY_IMAGE: &str = "https://media.publit.io/file/fil-pmn.gif";

pub struct Notifier {
    sink: Arc<dyn ChatSink>,
    team_abbrev: String,
}

impl Notifier {
    pub fn new(sink: Arc<dyn ChatSink>, team_abbrev: impl Into<String>) -> Self {
        Self {
            sink,
            team_abbrev: team_abbrev.into(),
        }
    }

    pub async fn announce_game_day(&self, opponent: &str, start: DateTime<Utc>) {
        let card = MessageCard {
            title: "It's Game Day!!!".to_string(),
            description: Some(format!("{opponent} gonna get stomped!")),
            timestamp: Some(start),
            image_url: Some(GAME_DAY_IMAGE.to_string()),
            ..Default::default()
        };
        self.deliver(card).await;
    }

    pub async fn announce_goal(&self, event: &ScoringEvent, home_abbrev: &str, away_abbrev: &str) {
        let mut description = format!(
            "{home_abbrev} {} - {} {away_abbrev}",
            event.home_score, event.away_score
        );
        if event.team_abbrev == self.team_abbrev {
            if let Some(n) = event.goals_to_date {
                description.push_str(&format!("\nHe has {n} goals this season!"));
            }
        }

        let mut fields = Vec::new();
        let mut when = format!("P{}", event.period);
        if let Some(t) = &event.time_in_period {
            when.push_str(&format!(" · {t}"));
        }
        if let Some(s) = &event.strength {
            if s != "ev" {
                when.push_str(&format!(" ({})", s.to_uppercase()));
            }
        }
        fields.push(("When".to_string(), when));
        let assists = if event.assists.is_empty() {
            "Unassisted".to_string()
        } else {
            event.assists.join(", ")
        };
        fields.push(("Assists".to_string(), assists));

        let card = MessageCard {
            title: format!("Goal scored by {}", event.scorer_name()),
            description: Some(description),
            fields,
            thumbnail_url: event.headshot_url.clone(),
            ..Default::default()
        };
        self.deliver(card).await;
    }

    pub async fn announce_final(&self, performers: &[TopPerformer]) {
        let fields = performers
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let name = match &p.team_abbrev {
                    Some(team) => format!("{} ({team})", p.name),
                    None => p.name.clone(),
                };
                let value = if p.stat_line.is_empty() {
                    "—".to_string()
                } else {
                    p.stat_line.clone()
                };
                (format!("⭐ {}", i + 1), format!("{name}\n{value}"))
            })
            .collect();

        let card = MessageCard {
            title: "That's the game!".to_string(),
            description: Some("Three stars of the game".to_string()),
            fields,
            ..Default::default()
        };
        self.deliver(card).await;
    }

    pub async fn announce_preview(&self, home_abbrev: &str, away_abbrev: &str, start: Option<DateTime<Utc>>) {
        let mut text = format!("Tonight: {away_abbrev} @ {home_abbrev}.");
        if let Some(start) = start {
            text.push_str(&format!(" Puck drops <t:{}:t>.", start.timestamp()));
        }
        if let Err(e) = self.sink.post_text(&text).await {
            warn!("preview notification failed: {e}");
        }
    }

    async fn deliver(&self, card: MessageCard) {
        if let Err(e) = self.sink.post_card(&card).await {
            warn!("notification failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HowlerError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        cards: Mutex<Vec<MessageCard>>,
        texts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatSink for RecordingSink {
        async fn post_text(&self, text: &str) -> Result<()> {
            if self.fail {
                return Err(HowlerError::Notification("channel unavailable".into()));
            }
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn post_card(&self, card: &MessageCard) -> Result<()> {
            if self.fail {
                return Err(HowlerError::Notification("channel unavailable".into()));
            }
            self.cards.lock().unwrap().push(card.clone());
            Ok(())
        }
    }

    fn goal(team: &str, goals_to_date: Option<u32>) -> ScoringEvent {
        ScoringEvent {
            team_abbrev: team.to_string(),
            period: 2,
            time_in_period: Some("04:31".to_string()),
            home_score: 2,
            away_score: 1,
            scorer_first_name: "Clayton".to_string(),
            scorer_last_name: "Keller".to_string(),
            assists: vec!["N. Schmaltz".to_string()],
            strength: Some("pp".to_string()),
            goals_to_date,
            headshot_url: Some("https://assets.nhle.com/keller.png".to_string()),
        }
    }

    #[tokio::test]
    async fn goal_card_carries_score_and_season_total_for_tracked_team() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), "ARI");

        notifier.announce_goal(&goal("ARI", Some(12)), "ARI", "VAN").await;

        let cards = sink.cards.lock().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Goal scored by Clayton Keller");
        let desc = cards[0].description.as_deref().unwrap();
        assert!(desc.contains("ARI 2 - 1 VAN"));
        assert!(desc.contains("12 goals this season"));
        assert_eq!(cards[0].thumbnail_url.as_deref(), Some("https://assets.nhle.com/keller.png"));
    }

    #[tokio::test]
    async fn opponent_goal_skips_season_total() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), "ARI");

        notifier.announce_goal(&goal("VAN", Some(30)), "ARI", "VAN").await;

        let cards = sink.cards.lock().unwrap();
        let desc = cards[0].description.as_deref().unwrap();
        assert!(!desc.contains("season"));
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let notifier = Notifier::new(sink.clone(), "ARI");

        // Must not panic or propagate
        notifier.announce_game_day("Canucks", Utc::now()).await;
        notifier.announce_preview("ARI", "VAN", None).await;
    }

    #[tokio::test]
    async fn final_card_lists_stars_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), "ARI");

        let performers = vec![
            TopPerformer {
                name: "C. Keller".to_string(),
                team_abbrev: Some("ARI".to_string()),
                stat_line: "2G 1A".to_string(),
            },
            TopPerformer {
                name: "T. Demko".to_string(),
                team_abbrev: Some("VAN".to_string()),
                stat_line: String::new(),
            },
        ];
        notifier.announce_final(&performers).await;

        let cards = sink.cards.lock().unwrap();
        assert_eq!(cards[0].fields.len(), 2);
        assert!(cards[0].fields[0].1.contains("C. Keller (ARI)"));
        assert!(cards[0].fields[1].1.contains("—"));
    }
}
