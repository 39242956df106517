pub mod board;
pub mod events;
pub mod feed;

pub use board::TournamentBoard;
pub use events::{TournamentChange, TournamentKey};
pub use feed::TournamentFeed;
