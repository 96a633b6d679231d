use crate::domain::game::TrackedGame;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime};

/// Derived stage of the daily cycle. Computed fresh on every tick from the
/// wall clock and the persisted record — never stored, so a crash mid-cycle
/// self-heals from the record alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inside the daily reset window; clear the tracked game
    ResetWindow,
    /// Just after reset; look up today's schedule
    DiscoveryWindow,
    /// A game is tracked and its window is open; poll the box score
    LiveTracking,
    /// Nothing to do this tick
    Idle,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::ResetWindow => "RESET",
            Phase::DiscoveryWindow => "DISCOVER",
            Phase::LiveTracking => "LIVE",
            Phase::Idle => "IDLE",
        }
    }
}

/// Configured daily window boundaries, in the reference zone.
#[derive(Debug, Clone, Copy)]
pub struct ClockWindows {
    pub reset_start: NaiveTime,
    pub reset_end: NaiveTime,
    /// Discovery window length following `reset_end`, seconds
    pub discovery_secs: u64,
}

/// Map "now" to a phase. Pure and total; `now` must already be expressed
/// in the reference zone. Reset takes precedence over everything else.
pub fn classify(
    now: DateTime<FixedOffset>,
    game: &TrackedGame,
    windows: &ClockWindows,
) -> Phase {
    let clock = now.time();

    if in_daily_window(windows.reset_start, windows.reset_end, clock) {
        return Phase::ResetWindow;
    }

    let discovery_end = windows
        .reset_end
        .overflowing_add_signed(Duration::seconds(windows.discovery_secs as i64))
        .0;
    if in_daily_window(windows.reset_end, discovery_end, clock) {
        return Phase::DiscoveryWindow;
    }

    if let Some(start_utc) = game.game_start {
        let start = start_utc.with_timezone(now.offset());
        // The live window runs from puck drop to the next reset. Anchoring
        // the boundary to today's date means an evening start sits after it,
        // which is exactly the over-midnight case.
        let window_end = now
            .date_naive()
            .and_time(windows.reset_start)
            .and_local_timezone(*now.offset())
            .single();
        if let Some(end) = window_end {
            let live = if start < end {
                start <= now && now < end
            } else {
                now >= start || now < end
            };
            if live {
                return Phase::LiveTracking;
            }
        }
    }

    Phase::Idle
}

/// Wrap-safe time-of-day interval test: `[start, end)`, crossing midnight
/// when `start >= end`.
fn in_daily_window(start: NaiveTime, end: NaiveTime, now: NaiveTime) -> bool {
    if start < end {
        start <= now && now < end
    } else {
        now >= start || now < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn windows() -> ClockWindows {
        ClockWindows {
            reset_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            reset_end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            discovery_secs: 45,
        }
    }

    fn zone() -> FixedOffset {
        FixedOffset::east_opt(-5 * 3600).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> DateTime<FixedOffset> {
        zone()
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(hh, mm, 0)
                    .unwrap(),
            )
            .unwrap()
    }

    fn game_starting_at(dt: DateTime<FixedOffset>) -> TrackedGame {
        TrackedGame {
            game_id: Some(2023020555),
            game_start: Some(dt.with_timezone(&Utc)),
            ..Default::default()
        }
    }

    #[test]
    fn evening_game_is_live_across_midnight() {
        let game = game_starting_at(local(2024, 1, 10, 22, 0));
        let phase = classify(local(2024, 1, 10, 23, 50), &game, &windows());
        assert_eq!(phase, Phase::LiveTracking);

        // Still live in the small hours of the next day
        let phase = classify(local(2024, 1, 11, 0, 30), &game, &windows());
        assert_eq!(phase, Phase::LiveTracking);
    }

    #[test]
    fn reset_takes_precedence_over_live_window() {
        let game = game_starting_at(local(2024, 1, 10, 22, 0));
        let phase = classify(local(2024, 1, 11, 9, 5), &game, &windows());
        assert_eq!(phase, Phase::ResetWindow);
    }

    #[test]
    fn discovery_window_follows_reset() {
        let game = TrackedGame::default();
        let phase = classify(local(2024, 1, 10, 10, 0), &game, &windows());
        assert_eq!(phase, Phase::DiscoveryWindow);

        // 45s window closed by 10:01
        let phase = classify(local(2024, 1, 10, 10, 1), &game, &windows());
        assert_eq!(phase, Phase::Idle);
    }

    #[test]
    fn no_game_start_outside_windows_is_idle() {
        let game = TrackedGame::default();
        let phase = classify(local(2024, 1, 10, 20, 0), &game, &windows());
        assert_eq!(phase, Phase::Idle);
    }

    #[test]
    fn afternoon_game_is_live_before_midnight() {
        let game = game_starting_at(local(2024, 1, 10, 14, 0));
        assert_eq!(
            classify(local(2024, 1, 10, 15, 30), &game, &windows()),
            Phase::LiveTracking
        );
        assert_eq!(
            classify(local(2024, 1, 10, 12, 0), &game, &windows()),
            Phase::Idle
        );
    }
}
