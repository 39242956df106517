use anyhow::Context;
use log::info;
use rusqlite::{Connection, TransactionBehavior};

use crate::config::settings::PlatformSettings;
use crate::database::{team_members, teams, Profile, Team, TeamInput};
use crate::domain::{generate_team_code, normalize_team_code};
use crate::errors::{PlatformError, PlatformResult};

pub const ROLE_CAPTAIN: &str = "captain";
pub const ROLE_MEMBER: &str = "member";

/// Creates a team with a fresh join code and enrols its captain.
pub fn create_team(
    conn: &mut Connection,
    captain: &Profile,
    input: &TeamInput,
    settings: &PlatformSettings,
) -> PlatformResult<Team> {
    create_with_captain(conn, captain, input, settings, false)
}

/// Like [`create_team`], but refuses a captain who already belongs to a
/// team. The membership check and the inserts hold the write lock together.
pub fn create_own_team(
    conn: &mut Connection,
    captain: &Profile,
    input: &TeamInput,
    settings: &PlatformSettings,
) -> PlatformResult<Team> {
    create_with_captain(conn, captain, input, settings, true)
}

fn create_with_captain(
    conn: &mut Connection,
    captain: &Profile,
    input: &TeamInput,
    settings: &PlatformSettings,
    single_team: bool,
) -> PlatformResult<Team> {
    if input.name.trim().is_empty() {
        return Err(PlatformError::invalid("team name is required"));
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to start transaction")?;
    if single_team && team_members::find_membership_of(&tx, &captain.id)?.is_some() {
        return Err(PlatformError::conflict("already a member of a team"));
    }
    let team_code = unused_team_code(&tx, settings)?;
    let team = teams::insert_team(&tx, input, &captain.id, &team_code)?;
    team_members::insert_member(&tx, &team.id, &captain.id, Some(ROLE_CAPTAIN))?;
    tx.commit().context("Failed to commit team creation")?;

    info!("Team {} created by {} with code {}", team.name, captain.username, team.team_code);
    Ok(team)
}

fn unused_team_code(conn: &Connection, settings: &PlatformSettings) -> PlatformResult<String> {
    for _ in 0..settings.team_code_attempts {
        let code = generate_team_code(settings.team_code_length);
        if !teams::code_exists(conn, &code)? {
            return Ok(code);
        }
    }
    Err(anyhow::anyhow!(
        "No unused team code after {} attempts",
        settings.team_code_attempts
    )
    .into())
}

/// Adds the profile to the team owning `code`. A profile belongs to at
/// most one team.
pub fn join_team(conn: &mut Connection, profile: &Profile, code: &str) -> PlatformResult<Team> {
    let code = normalize_team_code(code);
    if code.is_empty() {
        return Err(PlatformError::invalid("team code is required"));
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to start transaction")?;
    let team = join_in(&tx, profile, &code)?;
    tx.commit().context("Failed to commit team membership")?;
    Ok(team)
}

fn join_in(conn: &Connection, profile: &Profile, code: &str) -> PlatformResult<Team> {
    let team = teams::find_by_code(conn, code)?
        .ok_or_else(|| PlatformError::invalid("invalid team code"))?;

    if team_members::find_membership_of(conn, &profile.id)?.is_some() {
        return Err(PlatformError::conflict("already a member of a team"));
    }

    team_members::insert_member(conn, &team.id, &profile.id, Some(ROLE_MEMBER))?;
    info!("{} joined team {}", profile.username, team.name);
    Ok(team)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{memory_conn, profile, team_input};

    #[test]
    fn test_create_enrols_captain() {
        let (_pool, mut conn) = memory_conn();
        let captain = profile(&conn, "cap");

        let team = create_team(&mut conn, &captain, &team_input("Neon"), &PlatformSettings::default()).unwrap();

        assert_eq!(team.team_code.len(), 6);
        let members = team_members::list_for_team(&conn, &team.id).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].profile_id, captain.id);
        assert_eq!(members[0].role.as_deref(), Some(ROLE_CAPTAIN));
    }

    #[test]
    fn test_create_requires_name() {
        let (_pool, mut conn) = memory_conn();
        let captain = profile(&conn, "cap");

        let err = create_team(&mut conn, &captain, &team_input("  "), &PlatformSettings::default()).unwrap_err();
        assert!(matches!(err, PlatformError::Invalid(_)));
    }

    #[test]
    fn test_join_with_lowercase_code() {
        let (_pool, mut conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let mate = profile(&conn, "mate");
        let team = create_team(&mut conn, &captain, &team_input("Neon"), &PlatformSettings::default()).unwrap();

        let joined = join_team(&mut conn, &mate, &format!(" {} ", team.team_code.to_lowercase())).unwrap();

        assert_eq!(joined.id, team.id);
        assert!(team_members::is_member(&conn, &team.id, &mate.id).unwrap());
    }

    #[test]
    fn test_join_rejections() {
        let (_pool, mut conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let mate = profile(&conn, "mate");
        let team = create_team(&mut conn, &captain, &team_input("Neon"), &PlatformSettings::default()).unwrap();

        assert!(matches!(join_team(&mut conn, &mate, "NOPE00"), Err(PlatformError::Invalid(_))));
        assert!(matches!(join_team(&mut conn, &mate, ""), Err(PlatformError::Invalid(_))));
        assert!(matches!(
            join_team(&mut conn, &captain, &team.team_code),
            Err(PlatformError::Conflict(_))
        ));

        join_team(&mut conn, &mate, &team.team_code).unwrap();
        assert!(matches!(
            join_team(&mut conn, &mate, &team.team_code),
            Err(PlatformError::Conflict(_))
        ));
    }

    #[test]
    fn test_own_team_requires_free_captain() {
        let (_pool, mut conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let settings = PlatformSettings::default();
        create_own_team(&mut conn, &captain, &team_input("Neon"), &settings).unwrap();

        let second = create_own_team(&mut conn, &captain, &team_input("Volt"), &settings).unwrap_err();
        assert_eq!(second.to_string(), "already a member of a team");
        assert!(teams::list_with_captains(&conn).unwrap().iter().all(|t| t.team.name != "Volt"));

        create_team(&mut conn, &captain, &team_input("Admin Pick"), &settings).unwrap();
        assert_eq!(teams::list_with_captains(&conn).unwrap().len(), 2);
    }
}
