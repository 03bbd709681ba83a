pub mod leaderboard;
pub mod leveling;

pub use leaderboard::{display_name, rank, LEADERBOARD_SIZE};
pub use leveling::{apply_xp, Progress, STARTING_XP_TO_NEXT_LEVEL};
