use anyhow::Context;
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

use crate::database::{registrations, tournaments, Profile, Registration};
use crate::domain::payment_status;
use crate::errors::{PlatformError, PlatformResult};

/// Registers a profile for a tournament.
///
/// Rejects duplicate registrations, registrations after the deadline and
/// registrations once every slot is taken. The checks and the insert share
/// one write-locked transaction.
pub fn register(
    conn: &mut Connection,
    profile: &Profile,
    tournament_id: &str,
    now: DateTime<Utc>,
) -> PlatformResult<Registration> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to start transaction")?;
    let registration = register_in(&tx, profile, tournament_id, now)?;
    tx.commit().context("Failed to commit registration")?;
    Ok(registration)
}

fn register_in(
    conn: &Connection,
    profile: &Profile,
    tournament_id: &str,
    now: DateTime<Utc>,
) -> PlatformResult<Registration> {
    let tournament = tournaments::find_by_id(conn, tournament_id)?
        .ok_or(PlatformError::NotFound("tournament"))?;

    if registrations::is_registered(conn, &tournament.id, &profile.id)? {
        return Err(PlatformError::conflict("already registered for this tournament"));
    }
    if now > tournament.registration_deadline {
        return Err(PlatformError::conflict("registration closed"));
    }
    if registrations::count_for_tournament(conn, &tournament.id)? >= tournament.max_teams {
        return Err(PlatformError::conflict("tournament is full"));
    }

    let status = payment_status(tournament.entry_fee.as_deref());
    let registration =
        registrations::insert_registration(conn, &tournament.id, Some(&profile.id), None, status)?;

    info!(
        "{} registered for {} ({})",
        profile.username, tournament.title, registration.payment_status
    );
    Ok(registration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{memory_conn, profile, tournament, tournament_input};
    use chrono::Duration;

    #[test]
    fn test_free_and_paid_registrations() {
        let (_pool, mut conn) = memory_conn();
        let player = profile(&conn, "player");
        let admin = profile(&conn, "admin");
        let free = tournament(&conn, "Free Cup", 8);
        let mut paid_input = tournament_input("Paid Cup", 8);
        paid_input.entry_fee = Some("₹500".to_string());
        let paid = tournaments::insert_tournament(&conn, &paid_input, "Registration Open", &admin.id).unwrap();

        assert_eq!(register(&mut conn, &player, &free.id, Utc::now()).unwrap().payment_status, "Free");
        assert_eq!(register(&mut conn, &player, &paid.id, Utc::now()).unwrap().payment_status, "Pending");
    }

    #[test]
    fn test_rejections() {
        let (_pool, mut conn) = memory_conn();
        let first = profile(&conn, "first");
        let second = profile(&conn, "second");
        let tiny = tournament(&conn, "Tiny", 1);

        assert!(matches!(
            register(&mut conn, &first, "missing", Utc::now()),
            Err(PlatformError::NotFound("tournament"))
        ));

        register(&mut conn, &first, &tiny.id, Utc::now()).unwrap();
        let duplicate = register(&mut conn, &first, &tiny.id, Utc::now()).unwrap_err();
        assert_eq!(duplicate.to_string(), "already registered for this tournament");

        let full = register(&mut conn, &second, &tiny.id, Utc::now()).unwrap_err();
        assert_eq!(full.to_string(), "tournament is full");

        let late = register(&mut conn, &second, &tiny.id, tiny.registration_deadline + Duration::minutes(1)).unwrap_err();
        assert_eq!(late.to_string(), "registration closed");
    }

    #[test]
    fn test_concurrent_registrations_respect_capacity() {
        let path = std::env::temp_dir().join(format!("arena-{}.db", uuid::Uuid::new_v4()));
        let pool = crate::database::create_pool(path.to_str().unwrap()).unwrap();
        let (cup, players) = {
            let conn = pool.get().unwrap();
            crate::database::setup::reset_database(&conn).unwrap();
            let cup = tournament(&conn, "One Slot", 1);
            let players: Vec<Profile> = (0..6).map(|i| profile(&conn, &format!("player{i}"))).collect();
            (cup, players)
        };

        let barrier = std::sync::Arc::new(std::sync::Barrier::new(players.len()));
        let handles: Vec<_> = players
            .into_iter()
            .map(|player| {
                let pool = pool.clone();
                let barrier = barrier.clone();
                let cup_id = cup.id.clone();
                std::thread::spawn(move || {
                    let mut conn = pool.get().unwrap();
                    barrier.wait();
                    register(&mut conn, &player, &cup_id, Utc::now()).is_ok()
                })
            })
            .collect();
        let accepted = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();

        let conn = pool.get().unwrap();
        assert_eq!(accepted, 1);
        assert_eq!(registrations::count_for_tournament(&conn, &cup.id).unwrap(), 1);
        drop(conn);
        drop(pool);
        let _ = std::fs::remove_file(path);
    }
}
