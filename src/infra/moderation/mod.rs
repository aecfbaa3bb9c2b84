// Moderation infra layer.
// - `json_store.rs` persists per-guild filter documents as JSON files.

pub mod json_store;

pub use json_store::JsonFilterStorage;
