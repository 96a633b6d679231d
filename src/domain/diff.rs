use crate::domain::game::ScoringEvent;

/// Outcome of comparing the freshly extracted goal sequence against the
/// persisted one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalDiff {
    /// New goals, in chronological order; caller notifies each in order
    pub appended: Vec<ScoringEvent>,
    /// The provider shortened the sequence (a goal was disallowed).
    /// Caller persists the new sequence as truth; no retraction is sent.
    pub truncated: bool,
}

impl GoalDiff {
    pub fn is_noop(&self) -> bool {
        self.appended.is_empty() && !self.truncated
    }
}

/// Positional diff of two goal sequences. The provider appends during
/// normal play, so only length matters: a longer `current` yields its
/// tail, a shorter one signals a correction.
pub fn diff_events(previous: &[ScoringEvent], current: &[ScoringEvent]) -> GoalDiff {
    if current.len() > previous.len() {
        GoalDiff {
            appended: current[previous.len()..].to_vec(),
            truncated: false,
        }
    } else if current.len() < previous.len() {
        GoalDiff {
            appended: Vec::new(),
            truncated: true,
        }
    } else {
        GoalDiff::default()
    }
}
