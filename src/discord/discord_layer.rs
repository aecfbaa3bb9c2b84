// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "moderation/mod.rs"]
pub mod moderation;

use crate::core::moderation::{FilterConfigService, MessageFilterService};
use crate::infra::moderation::JsonFilterStorage;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command and event.
///
/// Both services wrap the same `FilterStore`, so a config change is seen by
/// the message filter immediately.
pub struct Data {
    pub filters: Arc<MessageFilterService<JsonFilterStorage>>,
    pub filter_config: Arc<FilterConfigService<JsonFilterStorage>>,
}
