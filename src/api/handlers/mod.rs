use serde::Deserialize;

use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::realtime::TournamentFeed;

pub mod admin;
pub mod leaderboard;
pub mod news;
pub mod profiles;
pub mod schedule;
pub mod streams;
pub mod teams;
pub mod tournaments;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub feed: TournamentFeed,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let feed = TournamentFeed::new(config.server.feed_capacity);
        Self { pool, config, feed }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TournamentParams {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    pub live: Option<bool>,
}
