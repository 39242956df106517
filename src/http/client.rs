use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::config::settings::ClientSettings;
use crate::database::Tournament;

/// Read-only HTTP client for a running arena server.
pub struct ArenaClient {
    client: Client,
    base_url: String,
}

impl ArenaClient {
    pub fn new(base_url: &str, settings: &ClientSettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Current tournament list, newest first. Card fields beyond the
    /// tournament row are ignored.
    pub async fn fetch_tournaments(&self) -> Result<Vec<Tournament>> {
        let url = format!("{}/api/tournaments", self.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .context("Failed to send GET request")?
            .error_for_status()
            .with_context(|| format!("Server rejected {}", url))?
            .json()
            .await
            .context("Failed to decode tournament list")
    }

    pub fn changes_url(&self) -> Result<String> {
        websocket_url(&self.base_url, "/api/tournaments/changes")
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}

fn websocket_url(base_url: &str, path: &str) -> Result<String> {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        bail!("Unsupported server URL: {}", base_url);
    };
    Ok(format!("{ws_base}{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url() {
        assert_eq!(
            websocket_url("http://127.0.0.1:3000/", "/api/tournaments/changes").unwrap(),
            "ws://127.0.0.1:3000/api/tournaments/changes"
        );
        assert_eq!(
            websocket_url("https://arena.example", "/x").unwrap(),
            "wss://arena.example/x"
        );
        assert!(websocket_url("ftp://arena.example", "/x").is_err());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ArenaClient::new("http://localhost:3000///", &ClientSettings::default()).unwrap();
        assert_eq!(client.changes_url().unwrap(), "ws://localhost:3000/api/tournaments/changes");
    }
}
