#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_path: String,
    pub feed_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "esports_arena.db".to_string()),
            feed_capacity: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformSettings {
    pub team_code_length: usize,
    pub team_code_attempts: usize,
    pub default_tournament_status: &'static str,
    pub default_match_status: &'static str,
    pub default_news_category: &'static str,
    pub leaderboard_limit: usize,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            team_code_length: 6,
            team_code_attempts: 8,
            default_tournament_status: "Registration Open",
            default_match_status: "Scheduled",
            default_news_category: "General",
            leaderboard_limit: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub user_agent: &'static str,
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: "EsportsArenaWatcher/0.1",
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub platform: PlatformSettings,
    pub client: ClientSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server: ServerSettings::default(),
            platform: PlatformSettings::default(),
            client: ClientSettings::default(),
        }
    }
}
