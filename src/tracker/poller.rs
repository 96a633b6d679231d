//! The recurring poll cycle that drives the tracker.
//!
//! Every tick: reload the persisted record, classify the daily phase from
//! the wall clock, run the phase's work, write the record back. One cycle
//! runs at a time; the interval itself is the retry policy — every failure
//! degrades to "try again next tick".

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::domain::{classify, diff_events, ClockWindows, Phase, TrackedGame};
use crate::error::{HowlerError, Result};
use crate::tracker::extract::{extract_goals, extract_top_performers};
use crate::tracker::notify::Notifier;
use crate::tracker::traits::{ScheduleSource, StateStore};

pub struct GameTracker {
    source: Arc<dyn ScheduleSource>,
    store: Arc<dyn StateStore>,
    notifier: Notifier,
    team_abbrev: String,
    tracker_id: String,
    windows: ClockWindows,
    zone: FixedOffset,
    poll_interval: Duration,
    // Single-flight guard: a new tick never overlaps a running cycle
    cycle_guard: Mutex<()>,
}

impl GameTracker {
    pub fn new(
        cfg: &TrackerConfig,
        source: Arc<dyn ScheduleSource>,
        store: Arc<dyn StateStore>,
        notifier: Notifier,
    ) -> Result<Self> {
        let windows = cfg.clock_windows().map_err(HowlerError::Validation)?;

        Ok(Self {
            source,
            store,
            notifier,
            team_abbrev: cfg.team_abbrev.clone(),
            tracker_id: cfg.tracker_id.clone(),
            windows,
            zone: cfg.reference_offset(),
            poll_interval: Duration::from_secs(cfg.poll_interval_secs),
            cycle_guard: Mutex::new(()),
        })
    }

    /// Run the poll loop forever (call from a spawned task).
    pub async fn run_forever(&self) {
        info!(
            team = %self.team_abbrev,
            interval_secs = self.poll_interval.as_secs(),
            "GameTracker: starting"
        );

        let mut ticker = time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.tick(Utc::now()).await {
                warn!("GameTracker: poll cycle failed: {e}");
            }
        }
    }

    /// Execute a single poll cycle at the given instant.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<()> {
        let _guard = self.cycle_guard.lock().await;
        self.run_cycle(now.with_timezone(&self.zone)).await
    }

    async fn run_cycle(&self, now: DateTime<FixedOffset>) -> Result<()> {
        // The store is the only source of truth; never trust a copy from a
        // previous tick.
        let game = self
            .store
            .load(&self.tracker_id)
            .await?
            .unwrap_or_default();

        let phase = classify(now, &game, &self.windows);
        debug!(phase = phase.as_str(), "poll tick");

        match phase {
            Phase::ResetWindow => self.run_reset().await,
            Phase::DiscoveryWindow => {
                self.run_discovery(game, now.date_naive(), true).await
            }
            Phase::LiveTracking => self.run_live(game).await,
            Phase::Idle => {
                if !game.morning_announced && !game.has_game() {
                    // The discovery window was missed (restart, outage):
                    // recover the schedule without announcing.
                    self.run_discovery(game, now.date_naive(), false).await
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Daily clear. Idempotent, so running it on every tick inside the
    /// window is fine.
    async fn run_reset(&self) -> Result<()> {
        self.store
            .save(&self.tracker_id, &TrackedGame::default())
            .await
    }

    /// Look up today's schedule. When the tracked team plays, persist the
    /// game and (in the announced path) post the game-day message.
    async fn run_discovery(
        &self,
        mut game: TrackedGame,
        today: NaiveDate,
        announce: bool,
    ) -> Result<()> {
        let games = match self.source.fetch_schedule(today).await {
            Ok(games) => games,
            Err(e) if e.is_transient_source() => {
                // Leave state untouched; the next eligible tick retries.
                warn!("schedule lookup failed, will retry: {e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let already_announced = game.morning_announced;
        game.morning_announced = true;

        let matchup = games.iter().find(|g| {
            g.home_team.abbrev == self.team_abbrev || g.away_team.abbrev == self.team_abbrev
        });

        let Some(matchup) = matchup else {
            // Off day. Persist the flag so the recovery path stops
            // re-polling the schedule all day.
            return self.store.save(&self.tracker_id, &game).await;
        };

        game.game_id = Some(matchup.id);
        game.game_start = Some(matchup.start_time_utc);

        // Persist before announcing: never notify without the resulting
        // state being durable.
        self.store.save(&self.tracker_id, &game).await?;

        if announce && !already_announced {
            let opponent = if matchup.home_team.abbrev == self.team_abbrev {
                matchup.away_team.place_name.resolve("en")
            } else {
                matchup.home_team.place_name.resolve("en")
            };
            info!(game_id = matchup.id, %opponent, "game day");
            self.notifier
                .announce_game_day(opponent, matchup.start_time_utc)
                .await;
        }

        Ok(())
    }

    /// Poll the box score, notify newly appended goals in order, then
    /// persist; on terminal status post the summary and clear the game.
    async fn run_live(&self, mut game: TrackedGame) -> Result<()> {
        let Some(game_id) = game.game_id else {
            // Start time without an id is inconsistent state; discovery
            // will repopulate it on the next cycle.
            return Ok(());
        };

        let box_score = match self.source.fetch_box_score(game_id).await {
            Ok(b) => b,
            Err(e) if e.is_transient_source() => {
                debug!("box score not available yet: {e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Pre-game preview, once, the first tick the landing page is
        // published.
        if !game.preview_announced && box_score.summary.is_some() {
            game.preview_announced = true;
            self.store.save(&self.tracker_id, &game).await?;
            self.notifier
                .announce_preview(
                    box_score.home_abbrev(),
                    box_score.away_abbrev(),
                    game.game_start,
                )
                .await;
        }

        let current = extract_goals(&box_score);
        let diff = diff_events(&game.events, &current);

        if diff.truncated {
            // Provider correction (disallowed goal). Accept the shorter
            // sequence silently; no retraction message is sent.
            info!(
                previous = game.events.len(),
                current = current.len(),
                "goal sequence shortened by provider"
            );
        }

        if !diff.is_noop() {
            for event in &diff.appended {
                info!(
                    scorer = %event.scorer_name(),
                    home = event.home_score,
                    away = event.away_score,
                    "goal"
                );
                self.notifier
                    .announce_goal(event, box_score.home_abbrev(), box_score.away_abbrev())
                    .await;
            }
            // Persist only after the notifications for this tick went out;
            // a crash in between re-notifies rather than drops a goal.
            game.events = current;
            self.store.save(&self.tracker_id, &game).await?;
        }

        if box_score.is_final() {
            info!(game_id, "game over");
            let stars = extract_top_performers(&box_score);
            self.notifier.announce_final(&stars).await;
            game.clear_game();
            self.store.save(&self.tracker_id, &game).await?;
        }

        Ok(())
    }
}
