pub mod extract;
pub mod notify;
pub mod poller;
pub mod traits;

pub use extract::{extract_goals, extract_top_performers, TopPerformer};
pub use notify::Notifier;
pub use poller::GameTracker;
pub use traits::{ChatSink, MessageCard, ScheduleSource, StateStore};
