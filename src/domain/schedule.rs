use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::MatchWithTournament;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub upcoming: Vec<MatchWithTournament>,
    pub past: Vec<MatchWithTournament>,
}

/// Splits matches around `now`. Input is expected in ascending start time;
/// upcoming keeps that order, past is reversed so the latest comes first.
pub fn partition_schedule(matches: Vec<MatchWithTournament>, now: DateTime<Utc>) -> Schedule {
    let (upcoming, mut past): (Vec<_>, Vec<_>) = matches
        .into_iter()
        .partition(|m| m.details.start_time >= now);
    past.reverse();
    Schedule { upcoming, past }
}
