//! Command handling module.
//!
//! Routes inbound chat messages to the karma and daily-menu handlers.

mod dailymenu;
mod karma;
mod router;

pub use dailymenu::{DailyMenuCommand, PageMenu, Restaurant, COMMAND as DAILYMENU_COMMAND};
pub use karma::{KarmaCommand, DISLIKE_COMMAND, LIKE_COMMAND};
pub use router::CommandRouter;
