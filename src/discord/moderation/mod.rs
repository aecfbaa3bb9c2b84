// Discord-specific moderation glue.
// - `commands.rs` exposes the filter configuration slash commands.
// - `filter_handler.rs` applies filter decisions to incoming messages.

pub mod commands;
pub mod filter_handler;
