//! Derives the ordered goal sequence (and the post-game star list) from a
//! box-score payload. Absent periods or scoring sections yield zero events
//! for the call — the common shape of a not-yet-started or data-lagging
//! game.

use crate::adapters::nhl::{BoxScore, StarPerformer};
use crate::domain::ScoringEvent;

/// Locale tried first when resolving name fields; the provider default is
/// the fallback.
const PREFERRED_LOCALE: &str = "en";

/// Flatten the reported periods, in order, stamping each goal with its
/// period number.
pub fn extract_goals(box_score: &BoxScore) -> Vec<ScoringEvent> {
    let Some(summary) = &box_score.summary else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for period in &summary.scoring {
        let number = period
            .period_descriptor
            .as_ref()
            .map(|d| d.number)
            .unwrap_or(0);

        for goal in &period.goals {
            events.push(ScoringEvent {
                team_abbrev: goal.team_abbrev.resolve(PREFERRED_LOCALE).to_string(),
                period: number,
                time_in_period: goal.time_in_period.clone(),
                home_score: goal.home_score,
                away_score: goal.away_score,
                scorer_first_name: goal.first_name.resolve(PREFERRED_LOCALE).to_string(),
                scorer_last_name: goal.last_name.resolve(PREFERRED_LOCALE).to_string(),
                assists: goal
                    .assists
                    .iter()
                    .map(|a| a.display_name(PREFERRED_LOCALE))
                    .filter(|n| !n.is_empty())
                    .collect(),
                strength: goal.strength.clone(),
                goals_to_date: goal.goals_to_date,
                headshot_url: goal.headshot.clone(),
            });
        }
    }

    events
}

/// Post-game summary line for one of the three stars
#[derive(Debug, Clone, PartialEq)]
pub struct TopPerformer {
    pub name: String,
    pub team_abbrev: Option<String>,
    pub stat_line: String,
}

/// Up to three top performers from the summary, in star order.
pub fn extract_top_performers(box_score: &BoxScore) -> Vec<TopPerformer> {
    let Some(summary) = &box_score.summary else {
        return Vec::new();
    };

    summary
        .three_stars
        .iter()
        .take(3)
        .map(|star| TopPerformer {
            name: star_name(star),
            team_abbrev: star.team_abbrev.clone(),
            stat_line: stat_line(star),
        })
        .collect()
}

fn star_name(star: &StarPerformer) -> String {
    if let Some(name) = &star.name {
        let resolved = name.resolve(PREFERRED_LOCALE);
        if !resolved.is_empty() {
            return resolved.to_string();
        }
    }
    let first = star
        .first_name
        .as_ref()
        .map(|n| n.resolve(PREFERRED_LOCALE))
        .unwrap_or("");
    let last = star
        .last_name
        .as_ref()
        .map(|n| n.resolve(PREFERRED_LOCALE))
        .unwrap_or("");
    format!("{first} {last}").trim().to_string()
}

fn stat_line(star: &StarPerformer) -> String {
    match (star.goals, star.assists, star.points) {
        (Some(g), Some(a), _) => format!("{g}G {a}A"),
        (_, _, Some(p)) => format!("{p} pts"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn box_score(value: serde_json::Value) -> BoxScore {
        serde_json::from_value(value).expect("fixture should parse")
    }

    #[test]
    fn missing_summary_yields_no_events() {
        let b = box_score(json!({"id": 1, "gameState": "FUT"}));
        assert!(extract_goals(&b).is_empty());
        assert!(extract_top_performers(&b).is_empty());
    }

    #[test]
    fn missing_scoring_section_yields_no_events() {
        let b = box_score(json!({"id": 1, "gameState": "LIVE", "summary": {}}));
        assert!(extract_goals(&b).is_empty());
    }

    #[test]
    fn goals_are_flattened_in_period_order() {
        let b = box_score(json!({
            "id": 1,
            "gameState": "LIVE",
            "summary": {
                "scoring": [
                    {
                        "periodDescriptor": {"number": 1},
                        "goals": [{
                            "firstName": {"default": "Clayton"},
                            "lastName": {"default": "Keller"},
                            "teamAbbrev": {"default": "ARI"},
                            "homeScore": 1,
                            "awayScore": 0,
                            "goalsToDate": 12,
                            "timeInPeriod": "04:31",
                            "strength": "pp",
                            "assists": [{"name": {"default": "N. Schmaltz"}}]
                        }]
                    },
                    {
                        "periodDescriptor": {"number": 3},
                        "goals": [{
                            "firstName": {"default": "Elias"},
                            "lastName": {"default": "Pettersson"},
                            "teamAbbrev": "VAN",
                            "homeScore": 1,
                            "awayScore": 1
                        }]
                    }
                ]
            }
        }));

        let events = extract_goals(&b);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].period, 1);
        assert_eq!(events[0].team_abbrev, "ARI");
        assert_eq!(events[0].scorer_name(), "Clayton Keller");
        assert_eq!(events[0].assists, vec!["N. Schmaltz".to_string()]);
        assert_eq!(events[0].goals_to_date, Some(12));
        assert_eq!(events[0].strength.as_deref(), Some("pp"));

        assert_eq!(events[1].period, 3);
        assert_eq!(events[1].team_abbrev, "VAN");
        assert!(events[1].assists.is_empty());
    }

    #[test]
    fn period_without_goals_contributes_nothing() {
        let b = box_score(json!({
            "id": 1,
            "summary": {"scoring": [{"periodDescriptor": {"number": 2}}]}
        }));
        assert!(extract_goals(&b).is_empty());
    }

    #[test]
    fn top_performers_cap_at_three() {
        let b = box_score(json!({
            "id": 1,
            "gameState": "FINAL",
            "summary": {
                "threeStars": [
                    {"star": 1, "name": {"default": "C. Keller"}, "teamAbbrev": "ARI", "goals": 2, "assists": 1},
                    {"star": 2, "firstName": {"default": "Nick"}, "lastName": {"default": "Schmaltz"}, "points": 2},
                    {"star": 3, "name": "L. Crouse"},
                    {"star": 4, "name": "One Too Many"}
                ]
            }
        }));

        let stars = extract_top_performers(&b);
        assert_eq!(stars.len(), 3);
        assert_eq!(stars[0].name, "C. Keller");
        assert_eq!(stars[0].stat_line, "2G 1A");
        assert_eq!(stars[1].name, "Nick Schmaltz");
        assert_eq!(stars[1].stat_line, "2 pts");
        assert_eq!(stars[2].name, "L. Crouse");
    }
}
