pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod tracker;

pub use adapters::{DiscordWebhook, NhlClient, PostgresStore};
pub use config::AppConfig;
pub use domain::{ScoringEvent, TrackedGame};
pub use error::{HowlerError, Result};
pub use tracker::{GameTracker, Notifier};
