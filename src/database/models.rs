use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_admin: bool,
    #[serde(skip)]
    pub api_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub bio: Option<String>,
    pub region: Option<String>,
    pub logo_url: Option<String>,
    pub captain_id: String,
    pub team_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub team_id: String,
    pub profile_id: String,
    pub role: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: DateTime<Utc>,
    pub prize_pool: Option<String>,
    pub entry_fee: Option<String>,
    pub max_teams: i64,
    pub team_size: String,
    pub mode: String,
    pub status: String,
    pub image_url: Option<String>,
    pub rules: Option<String>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub tournament_id: String,
    pub profile_id: Option<String>,
    pub team_id: Option<String>,
    pub payment_status: String,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub tournament_id: String,
    pub round_number: i64,
    pub match_number: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub map: Option<String>,
    pub status: String,
    pub stream_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchParticipant {
    pub id: String,
    pub match_id: String,
    pub team_id: Option<String>,
    pub profile_id: Option<String>,
    pub placement: Option<i64>,
    pub kills: Option<i64>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub author_id: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub id: String,
    pub profile_id: String,
    pub total_matches: i64,
    pub wins: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub kd_ratio: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub stream_url: String,
    pub is_live: bool,
    pub viewers: i64,
    pub streamer: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Write payloads

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub name: String,
    pub bio: Option<String>,
    pub region: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentInput {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: DateTime<Utc>,
    pub prize_pool: Option<String>,
    pub entry_fee: Option<String>,
    pub max_teams: i64,
    pub team_size: String,
    pub mode: String,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub rules: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInput {
    pub tournament_id: String,
    pub round_number: i64,
    pub match_number: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub map: Option<String>,
    pub status: Option<String>,
    pub stream_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    pub team_id: Option<String>,
    pub profile_id: Option<String>,
    pub placement: Option<i64>,
    pub kills: Option<i64>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInput {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub stream_url: String,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub viewers: i64,
    pub streamer: String,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsInput {
    pub total_matches: i64,
    pub wins: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
}

// DTOs for joined queries

#[derive(Debug, Clone)]
pub struct TeamWithCaptain {
    pub team: Team,
    pub captain_username: Option<String>,
    pub captain_full_name: Option<String>,
    pub member_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithProfile {
    pub id: String,
    pub profile_id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWithTournament {
    #[serde(flatten)]
    pub details: Match,
    pub tournament_title: String,
}

#[derive(Debug, Clone)]
pub struct StatsWithProfile {
    pub stats: PlayerStats,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCounts {
    pub profiles: i64,
    pub teams: i64,
    pub tournaments: i64,
    pub registrations: i64,
    pub matches: i64,
    pub news: i64,
    pub streams: i64,
    pub player_stats: i64,
}
