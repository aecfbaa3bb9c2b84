// Message filter service - core business logic for the per-message pipeline.
//
// For every message:
// - skip our own messages and direct messages
// - run the media classifier if the channel has media filter settings
// - otherwise (or if no media type triggered) run the word filter
//
// NO Discord dependencies here - the Discord layer performs the delete and
// the notice based on the returned `FilterAction`.

use super::filter_store::{FilterStorage, FilterStore, FilterStoreError};
use super::media_classifier::classify;
use super::moderation_models::{FilterAction, MessageSnapshot};
use super::word_filter::find_banned_words;
use std::sync::Arc;

pub struct MessageFilterService<S: FilterStorage> {
    store: Arc<FilterStore<S>>,
}

impl<S: FilterStorage> MessageFilterService<S> {
    pub fn new(store: Arc<FilterStore<S>>) -> Self {
        Self { store }
    }

    /// Decide what to do with a message.
    ///
    /// `bot_user_id` is our own user id; messages we sent are never filtered.
    pub async fn check_message(
        &self,
        message: &MessageSnapshot,
        bot_user_id: u64,
    ) -> Result<FilterAction, FilterStoreError> {
        if message.author_id == bot_user_id {
            return Ok(FilterAction::None);
        }

        let Some(guild_id) = message.guild_id else {
            return Ok(FilterAction::None);
        };

        if let Some(channel_filters) = self
            .store
            .channel_filters(guild_id, message.channel_id)
            .await?
        {
            let media_types = classify(message, &channel_filters);
            if !media_types.is_empty() {
                return Ok(FilterAction::DeleteForMedia { media_types });
            }
        }

        let banned = self.store.banned_words(guild_id).await?;
        let words = find_banned_words(&message.content, &banned);
        if !words.is_empty() {
            return Ok(FilterAction::DeleteForWords { words });
        }

        Ok(FilterAction::None)
    }
}

// ============================================================================
// TESTS
// ============================================================================
