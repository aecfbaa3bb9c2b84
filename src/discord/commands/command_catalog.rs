// Discord commands module.
// Each feature gets its own command file; `all()` is the single table of
// commands the framework registers.

pub mod clean;
pub mod fun;
pub mod help;
pub mod presence;
pub mod stats;

use crate::discord::moderation::commands as filters;
use crate::discord::{Data, Error};

/// Every slash command the bot exposes, in help order.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        filters::media_filter(),
        filters::media_filter_status(),
        filters::filter_add(),
        filters::filter_remove(),
        filters::filter_list(),
        clean::clean(),
        fun::coinflip(),
        fun::magic_8_ball_command(),
        stats::stats(),
        help::help(),
    ]
}
