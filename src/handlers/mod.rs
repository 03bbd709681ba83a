mod help_handler;
mod start_handler;
mod stats_handler;
mod update_router;

pub use help_handler::{FALLBACK_TEXT, HELP_TEXT};
pub use start_handler::OPEN_GAME_BUTTON;
pub use update_router::{process_update, Command};
