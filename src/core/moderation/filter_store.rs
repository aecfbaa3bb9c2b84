// Filter store - per-guild cache in front of the filter storage port.
//
// Each guild has two independent documents: media filter settings and the
// banned word list. Both are loaded lazily on first use, cached for the
// lifetime of the process, and written back after every mutation.

use super::moderation_models::{BannedWordList, ChannelMediaFilters, GuildMediaFilters};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

// ============================================================================
// ERRORS
// ============================================================================

/// Storage failures that cannot be recovered by resetting the document.
#[derive(Debug, Error)]
pub enum FilterStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of reading a guild document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    /// The stored document was read as-is
    Found(T),
    /// The document was missing or malformed and has been reset to the default
    Recovered(T),
}

impl<T> Loaded<T> {
    pub fn was_recovered(&self) -> bool {
        matches!(self, Loaded::Recovered(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Loaded::Found(value) | Loaded::Recovered(value) => value,
        }
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Durable storage for per-guild filter documents.
///
/// Loads never fail for a missing or malformed document: implementations
/// write the default back and return `Loaded::Recovered`. Any other failure
/// is returned as an error.
#[async_trait]
pub trait FilterStorage: Send + Sync {
    async fn load_media_filters(
        &self,
        guild_id: u64,
    ) -> Result<Loaded<GuildMediaFilters>, FilterStoreError>;

    async fn load_word_list(&self, guild_id: u64)
        -> Result<Loaded<BannedWordList>, FilterStoreError>;

    async fn save_media_filters(
        &self,
        guild_id: u64,
        filters: &GuildMediaFilters,
    ) -> Result<(), FilterStoreError>;

    async fn save_word_list(
        &self,
        guild_id: u64,
        words: &BannedWordList,
    ) -> Result<(), FilterStoreError>;
}

// ============================================================================
// CACHE
// ============================================================================

/// Lazily populated, never evicted cache of guild filter documents.
///
/// Shared (behind an `Arc`) by the message filter and the config commands.
pub struct FilterStore<S: FilterStorage> {
    storage: S,
    media_filters: DashMap<u64, GuildMediaFilters>,
    word_lists: DashMap<u64, BannedWordList>,
    write_locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl<S: FilterStorage> FilterStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            media_filters: DashMap::new(),
            word_lists: DashMap::new(),
            write_locks: DashMap::new(),
        }
    }

    /// Media filter settings for a guild.
    pub async fn media_filters(&self, guild_id: u64) -> Result<GuildMediaFilters, FilterStoreError> {
        self.ensure_media_filters(guild_id).await?;
        Ok(self
            .media_filters
            .get(&guild_id)
            .map(|f| f.clone())
            .unwrap_or_default())
    }

    /// Settings for a single channel, `None` when the channel has no entry.
    pub async fn channel_filters(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<Option<ChannelMediaFilters>, FilterStoreError> {
        let filters = self.media_filters(guild_id).await?;
        Ok(filters.channel(channel_id).cloned())
    }

    pub async fn banned_words(&self, guild_id: u64) -> Result<BannedWordList, FilterStoreError> {
        self.ensure_word_list(guild_id).await?;
        Ok(self
            .word_lists
            .get(&guild_id)
            .map(|w| w.clone())
            .unwrap_or_default())
    }

    /// Apply `apply` to a copy of a guild's media filters, persist the copy,
    /// then make it visible in the cache.
    ///
    /// Nothing changes when `apply` or the save fails.
    pub async fn update_media_filters<R, E>(
        &self,
        guild_id: u64,
        apply: impl FnOnce(&mut GuildMediaFilters) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<FilterStoreError>,
    {
        self.ensure_media_filters(guild_id).await?;

        let lock = self.write_lock(guild_id);
        let _guard = lock.lock().await;

        let mut updated = self
            .media_filters
            .get(&guild_id)
            .map(|f| f.clone())
            .unwrap_or_default();
        let result = apply(&mut updated)?;

        self.storage.save_media_filters(guild_id, &updated).await?;
        self.media_filters.insert(guild_id, updated);
        tracing::debug!(guild_id, "Persisted media filter settings");
        Ok(result)
    }

    /// Apply `apply` to a copy of a guild's banned word list, persist the
    /// copy, then make it visible in the cache.
    ///
    /// Nothing changes when `apply` or the save fails.
    pub async fn update_word_list<R, E>(
        &self,
        guild_id: u64,
        apply: impl FnOnce(&mut BannedWordList) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<FilterStoreError>,
    {
        self.ensure_word_list(guild_id).await?;

        let lock = self.write_lock(guild_id);
        let _guard = lock.lock().await;

        let mut updated = self
            .word_lists
            .get(&guild_id)
            .map(|w| w.clone())
            .unwrap_or_default();
        let result = apply(&mut updated)?;

        self.storage.save_word_list(guild_id, &updated).await?;
        let words = updated.len();
        self.word_lists.insert(guild_id, updated);
        tracing::debug!(guild_id, words, "Persisted banned word list");
        Ok(result)
    }

    /// Serializes read-modify-save sequences per guild so saves land in order.
    fn write_lock(&self, guild_id: u64) -> Arc<Mutex<()>> {
        Arc::clone(&self.write_locks.entry(guild_id).or_default())
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    async fn ensure_media_filters(&self, guild_id: u64) -> Result<(), FilterStoreError> {
        if self.media_filters.contains_key(&guild_id) {
            return Ok(());
        }

        let loaded = self.storage.load_media_filters(guild_id).await?;
        if loaded.was_recovered() {
            tracing::info!(
                guild_id,
                "Media filter settings not found or corrupted, created new settings"
            );
        } else {
            tracing::info!(guild_id, "Media filter settings loaded");
        }

        // Another task may have loaded the guild while we were reading.
        self.media_filters
            .entry(guild_id)
            .or_insert(loaded.into_inner());
        Ok(())
    }

    async fn ensure_word_list(&self, guild_id: u64) -> Result<(), FilterStoreError> {
        if self.word_lists.contains_key(&guild_id) {
            return Ok(());
        }

        let loaded = self.storage.load_word_list(guild_id).await?;
        if loaded.was_recovered() {
            tracing::info!(guild_id, "Filter list not found or corrupted, created a new one");
        } else {
            tracing::info!(guild_id, "Filter list loaded");
        }

        self.word_lists.entry(guild_id).or_insert(loaded.into_inner());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
