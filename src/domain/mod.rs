pub mod leaderboard;
pub mod schedule;
pub mod teams;
pub mod tournaments;

pub use leaderboard::{kd_ratio, player_display_name, rank_players, win_rate, LeaderboardEntry};
pub use schedule::{partition_schedule, Schedule};
pub use teams::{generate_team_code, normalize_team_code};
pub use tournaments::{fill_percent, payment_status};
