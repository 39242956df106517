use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::{MatchParticipant, MatchWithTournament, MemberWithProfile, Profile, Team, Tournament};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub profile: Profile,
    pub api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentCard {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub registered_teams: i64,
    pub fill_percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetail {
    #[serde(flatten)]
    pub card: TournamentCard,
    pub is_registered: bool,
}

/// Team as shown to anyone: the join code is left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTeam {
    pub id: String,
    pub name: String,
    pub bio: Option<String>,
    pub region: Option<String>,
    pub logo_url: Option<String>,
    pub captain_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for PublicTeam {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            bio: team.bio,
            region: team.region,
            logo_url: team.logo_url,
            captain_id: team.captain_id,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    #[serde(flatten)]
    pub team: PublicTeam,
    pub captain_name: String,
    pub member_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: PublicTeam,
    pub members: Vec<MemberWithProfile>,
    pub is_captain: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamRequest {
    pub team_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub scheduled: MatchWithTournament,
    pub participants: Vec<MatchParticipant>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentTitle {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminScheduleResponse {
    pub matches: Vec<MatchWithTournament>,
    pub tournaments: Vec<TournamentTitle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStatsRequest {
    pub profile_id: String,
}
