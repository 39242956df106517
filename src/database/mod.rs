pub mod connection;
pub mod dashboard;
pub mod matches;
pub mod models;
pub mod news;
pub mod participants;
pub mod player_stats;
pub mod profiles;
pub mod registrations;
pub mod setup;
pub mod streams;
pub mod team_members;
pub mod teams;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Duration, Utc};
    use rusqlite::Connection;

    use super::connection::{create_memory_pool, get_connection, DbConn, DbPool};
    use super::models::{MatchInput, Profile, StreamInput, TeamInput, Tournament, TournamentInput};
    use super::{profiles, setup, tournaments};

    /// Fresh schema on a single in-memory connection. Keep the pool alive
    /// for as long as the connection is used.
    pub fn memory_conn() -> (DbPool, DbConn) {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        setup::reset_database(&conn).unwrap();
        (pool, conn)
    }

    pub fn profile(conn: &Connection, username: &str) -> Profile {
        profiles::insert_profile(conn, username, None).unwrap()
    }

    pub fn team_input(name: &str) -> TeamInput {
        TeamInput {
            name: name.to_string(),
            bio: None,
            region: Some("Delhi".to_string()),
            logo_url: None,
        }
    }

    pub fn tournament_input(title: &str, max_teams: i64) -> TournamentInput {
        let start = Utc::now() + Duration::days(14);
        TournamentInput {
            title: title.to_string(),
            description: None,
            start_date: start,
            end_date: None,
            registration_deadline: start - Duration::days(2),
            prize_pool: Some("100,000".to_string()),
            entry_fee: None,
            max_teams,
            team_size: "Squad (4 players)".to_string(),
            mode: "Online".to_string(),
            status: None,
            image_url: None,
            rules: None,
        }
    }

    pub fn tournament(conn: &Connection, title: &str, max_teams: i64) -> Tournament {
        let creator = profiles::find_by_username(conn, "organizer")
            .unwrap()
            .unwrap_or_else(|| profile(conn, "organizer"));
        tournaments::insert_tournament(
            conn,
            &tournament_input(title, max_teams),
            "Registration Open",
            &creator.id,
        )
        .unwrap()
    }

    pub fn match_input(tournament_id: &str, start_time: DateTime<Utc>) -> MatchInput {
        MatchInput {
            tournament_id: tournament_id.to_string(),
            round_number: 1,
            match_number: 1,
            start_time,
            end_time: None,
            map: None,
            status: None,
            stream_url: None,
        }
    }

    pub fn stream_input(title: &str, is_live: bool, viewers: i64) -> StreamInput {
        StreamInput {
            title: title.to_string(),
            description: None,
            thumbnail_url: "https://img.example/thumb.jpg".to_string(),
            stream_url: "https://stream.example/live".to_string(),
            is_live,
            viewers,
            streamer: "caster".to_string(),
            scheduled_for: None,
        }
    }
}
