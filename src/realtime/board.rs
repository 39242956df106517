use log::{debug, warn};

use super::events::TournamentChange;
use crate::database::Tournament;

/// Local copy of the tournament list kept current from change events.
///
/// Events are applied in arrival order and the last one wins. Nothing is
/// reordered, deduplicated or replayed.
#[derive(Debug, Clone, Default)]
pub struct TournamentBoard {
    tournaments: Vec<Tournament>,
}

impl TournamentBoard {
    pub fn new(tournaments: Vec<Tournament>) -> Self {
        Self { tournaments }
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    pub fn apply(&mut self, change: TournamentChange) {
        match change {
            TournamentChange::Insert { new } => self.upsert(new),
            TournamentChange::Update { new } => {
                if self.position(&new.id).is_none() {
                    debug!("Update for unseen tournament {}, adding it", new.id);
                }
                self.upsert(new);
            }
            TournamentChange::Delete { old } => match self.position(&old.id) {
                Some(index) => {
                    self.tournaments.remove(index);
                }
                None => debug!("Delete for unseen tournament {}, ignoring", old.id),
            },
        }
    }

    /// Parses a raw event frame and applies it. Malformed frames are logged
    /// and skipped.
    pub fn apply_frame(&mut self, frame: &str) -> bool {
        match serde_json::from_str::<TournamentChange>(frame) {
            Ok(change) => {
                self.apply(change);
                true
            }
            Err(e) => {
                warn!("Ignoring malformed tournament event: {}", e);
                false
            }
        }
    }

    fn upsert(&mut self, tournament: Tournament) {
        match self.position(&tournament.id) {
            Some(index) => self.tournaments[index] = tournament,
            None => self.tournaments.insert(0, tournament),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tournaments.iter().position(|t| t.id == id)
    }
}
