pub mod diff;
pub mod game;
pub mod phase;

pub use diff::{diff_events, GoalDiff};
pub use game::{ScoringEvent, TrackedGame};
pub use phase::{classify, ClockWindows, Phase};
