use anyhow::{Context, Result};
use colored::Colorize;
use futures_util::StreamExt;
use log::{info, warn};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::settings::AppConfig;
use crate::database::Tournament;
use crate::http::ArenaClient;
use crate::realtime::TournamentBoard;

/// Keeps a local tournament list in sync with a running server: seeds it
/// from the list endpoint, then merges every change frame and reprints.
pub struct WatchService {
    client: ArenaClient,
}

impl WatchService {
    pub fn new(server: &str, config: &AppConfig) -> Result<Self> {
        let client = ArenaClient::new(server, &config.client)?;
        Ok(Self { client })
    }

    pub async fn run(&self) -> Result<()> {
        let mut board = TournamentBoard::new(self.client.fetch_tournaments().await?);
        info!("Loaded {} tournaments", board.len());
        print_board(&board);

        let url = self.client.changes_url()?;
        let (mut socket, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("Failed to subscribe to {}", url))?;
        info!("Subscribed to {}", url);

        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if board.apply_frame(&text) {
                        print_board(&board);
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Change feed error: {}", e);
                    break;
                }
            }
        }

        info!("Change feed closed");
        Ok(())
    }
}

fn print_board(board: &TournamentBoard) {
    println!("{}", format!("Tournaments ({})", board.len()).bold());
    if board.is_empty() {
        println!("  {}", "No tournaments found".dimmed());
    }
    for tournament in board.tournaments() {
        println!("{}", board_line(tournament));
    }
}

fn board_line(tournament: &Tournament) -> String {
    let status = match tournament.status.as_str() {
        "Registration Open" => tournament.status.green(),
        "Completed" | "Cancelled" => tournament.status.dimmed(),
        _ => tournament.status.yellow(),
    };
    format!(
        "  {} [{}] {} | max {} | {}",
        tournament.title.bold(),
        status,
        tournament.start_date.format("%Y-%m-%d %H:%M"),
        tournament.max_teams,
        tournament.prize_pool.as_deref().unwrap_or("no prize pool"),
    )
}
