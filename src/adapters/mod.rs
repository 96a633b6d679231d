pub mod discord;
pub mod nhl;
pub mod postgres;

pub use discord::DiscordWebhook;
pub use nhl::{BoxScore, NhlClient, ScheduledGame};
pub use postgres::PostgresStore;
