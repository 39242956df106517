use log::debug;
use tokio::sync::broadcast;

use super::events::TournamentChange;

/// Fan-out of tournament changes to every connected subscriber.
///
/// Delivery is best effort: a subscriber that falls more than the channel
/// capacity behind loses the oldest events.
#[derive(Debug, Clone)]
pub struct TournamentFeed {
    sender: broadcast::Sender<TournamentChange>,
}

impl TournamentFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, change: TournamentChange) {
        let kind = change.kind();
        let id = change.tournament_id().to_string();
        match self.sender.send(change) {
            Ok(receivers) => debug!("Published {} for tournament {} to {} subscribers", kind, id, receivers),
            Err(_) => debug!("No subscribers for {} of tournament {}", kind, id),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TournamentChange> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
