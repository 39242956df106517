use serde::Serialize;

use crate::database::StatsWithProfile;

const UNKNOWN_PLAYER: &str = "Unknown Player";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub stats_id: String,
    pub profile_id: String,
    pub player_name: String,
    pub total_matches: i64,
    pub wins: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub kd_ratio: f64,
    pub win_rate: f64,
}

/// Kills per death rounded to two decimals. With no deaths the ratio is
/// the raw kill count.
pub fn kd_ratio(kills: i64, deaths: i64) -> f64 {
    if deaths > 0 {
        round_to(kills as f64 / deaths as f64, 2)
    } else {
        kills as f64
    }
}

/// Percentage of matches won, one decimal.
pub fn win_rate(wins: i64, total_matches: i64) -> f64 {
    if total_matches <= 0 {
        return 0.0;
    }
    round_to(wins as f64 / total_matches as f64 * 100.0, 1)
}

pub fn player_display_name(username: Option<&str>, full_name: Option<&str>) -> String {
    [username, full_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_PLAYER)
        .to_string()
}

/// Ranks rows in the order given, then keeps those whose display name
/// contains `search`. Filtering after ranking keeps ranks stable.
pub fn rank_players(rows: Vec<StatsWithProfile>, search: Option<&str>, limit: usize) -> Vec<LeaderboardEntry> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| into_entry(i + 1, row))
        .filter(|entry| match &needle {
            Some(needle) => entry.player_name.to_lowercase().contains(needle),
            None => true,
        })
        .take(limit)
        .collect()
}

fn into_entry(rank: usize, row: StatsWithProfile) -> LeaderboardEntry {
    let player_name = player_display_name(row.username.as_deref(), row.full_name.as_deref());
    let stats = row.stats;
    LeaderboardEntry {
        rank,
        win_rate: win_rate(stats.wins, stats.total_matches),
        stats_id: stats.id,
        profile_id: stats.profile_id,
        player_name,
        total_matches: stats.total_matches,
        wins: stats.wins,
        kills: stats.kills,
        deaths: stats.deaths,
        assists: stats.assists,
        kd_ratio: stats.kd_ratio,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
