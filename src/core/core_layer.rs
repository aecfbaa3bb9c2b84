// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "fun/fun_service.rs"]
pub mod fun;

#[path = "moderation/mod.rs"]
pub mod moderation;
