// Core moderation module - per-guild media and word filtering.
// Following the same pattern as the other core modules.

pub mod filter_config_service;
pub mod filter_store;
pub mod media_classifier;
pub mod moderation_models;
pub mod moderation_service;
pub mod purge;
pub mod word_filter;

pub use filter_config_service::*;
pub use filter_store::*;
pub use moderation_models::*;
pub use moderation_service::*;
pub use purge::*;
