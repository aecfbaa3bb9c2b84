// Filter configuration service - admin operations on the filter store.
//
// Mutations require the invoker to own the guild or hold the "Admin" role.
// Rejections are returned as `FilterConfigError` values whose messages are
// shown to the user as-is.

use super::filter_store::{FilterStorage, FilterStore, FilterStoreError};
use super::moderation_models::{BannedWordList, ChannelFilterStatus, Invoker, MediaType};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterConfigError {
    #[error("You need to be the server owner or have the Admin role to use this command.")]
    PermissionDenied,

    #[error("Invalid media type. Choose from: {}", MediaType::choices())]
    InvalidMediaType(String),

    #[error("Please provide a word to filter.")]
    EmptyWord,

    #[error("Word already in list.")]
    DuplicateWord,

    #[error("Word not found in list.")]
    WordNotFound,

    #[error("Filter storage error: {0}")]
    Store(#[from] FilterStoreError),
}

impl FilterConfigError {
    /// Whether the error is a user mistake rather than a storage failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, FilterConfigError::Store(_))
    }
}

pub struct FilterConfigService<S: FilterStorage> {
    store: Arc<FilterStore<S>>,
}

impl<S: FilterStorage> FilterConfigService<S> {
    pub fn new(store: Arc<FilterStore<S>>) -> Self {
        Self { store }
    }

    fn authorize(invoker: &Invoker) -> Result<(), FilterConfigError> {
        if invoker.can_configure_filters() {
            Ok(())
        } else {
            Err(FilterConfigError::PermissionDenied)
        }
    }

    /// Turn filtering of one media type on or off for a channel.
    pub async fn set_media_filter(
        &self,
        invoker: &Invoker,
        guild_id: u64,
        channel_id: u64,
        media_type: &str,
        enabled: bool,
    ) -> Result<MediaType, FilterConfigError> {
        Self::authorize(invoker)?;

        let media_type: MediaType = media_type
            .parse()
            .map_err(|_| FilterConfigError::InvalidMediaType(media_type.to_string()))?;

        self.store
            .update_media_filters(guild_id, |filters| {
                filters.set(channel_id, media_type, enabled);
                Ok::<_, FilterConfigError>(())
            })
            .await?;

        tracing::info!(
            guild_id,
            channel_id,
            user_id = invoker.user_id,
            media_type = %media_type,
            enabled,
            "Media filter updated"
        );
        Ok(media_type)
    }

    /// Current media filter state of a channel. Readable by everyone.
    pub async fn media_filter_status(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<ChannelFilterStatus, FilterStoreError> {
        let status = match self.store.channel_filters(guild_id, channel_id).await? {
            None => ChannelFilterStatus::Unconfigured,
            Some(filters) => ChannelFilterStatus::Configured(
                MediaType::ALL
                    .iter()
                    .map(|t| (*t, filters.is_enabled(*t)))
                    .collect(),
            ),
        };
        Ok(status)
    }

    /// Add a word to the guild's banned list. Returns the stored (lowercase) form.
    pub async fn add_banned_word(
        &self,
        invoker: &Invoker,
        guild_id: u64,
        word: &str,
    ) -> Result<String, FilterConfigError> {
        Self::authorize(invoker)?;

        if word.trim().is_empty() {
            return Err(FilterConfigError::EmptyWord);
        }

        let normalized = word.to_lowercase();
        self.store
            .update_word_list(guild_id, |words| {
                if words.insert(word) {
                    Ok(())
                } else {
                    Err(FilterConfigError::DuplicateWord)
                }
            })
            .await?;

        tracing::info!(guild_id, user_id = invoker.user_id, word = %normalized, "Banned word added");
        Ok(normalized)
    }

    /// Remove every case-insensitive match of `word`. Returns how many
    /// entries were removed.
    pub async fn remove_banned_word(
        &self,
        invoker: &Invoker,
        guild_id: u64,
        word: &str,
    ) -> Result<usize, FilterConfigError> {
        Self::authorize(invoker)?;

        let removed = self
            .store
            .update_word_list(guild_id, |words| match words.remove(word) {
                0 => Err(FilterConfigError::WordNotFound),
                n => Ok(n),
            })
            .await?;

        tracing::info!(guild_id, user_id = invoker.user_id, word, removed, "Banned word removed");
        Ok(removed)
    }

    pub async fn list_banned_words(
        &self,
        invoker: &Invoker,
        guild_id: u64,
    ) -> Result<BannedWordList, FilterConfigError> {
        Self::authorize(invoker)?;
        Ok(self.store.banned_words(guild_id).await?)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::filter_store::tests::MockFilterStorage;
    use crate::core::moderation::moderation_models::GuildMediaFilters;
    use std::sync::atomic::Ordering;

    const GUILD_ID: u64 = 456;
    const CHANNEL_ID: u64 = 789;

    fn admin() -> Invoker {
        Invoker {
            user_id: 1,
            role_names: vec!["Admin".to_string()],
            is_guild_owner: false,
        }
    }

    fn member() -> Invoker {
        Invoker {
            user_id: 2,
            role_names: vec!["Member".to_string()],
            is_guild_owner: false,
        }
    }

    fn setup() -> (Arc<FilterStore<MockFilterStorage>>, FilterConfigService<MockFilterStorage>) {
        let store = Arc::new(FilterStore::new(MockFilterStorage::default()));
        let service = FilterConfigService::new(Arc::clone(&store));
        (store, service)
    }

    #[tokio::test]
    async fn test_non_admin_cannot_add_word() {
        let (store, service) = setup();

        let result = service.add_banned_word(&member(), GUILD_ID, "spam").await;

        assert!(matches!(result, Err(FilterConfigError::PermissionDenied)));
        assert!(store.banned_words(GUILD_ID).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_word_normalizes_and_rejects_duplicates() {
        let (store, service) = setup();

        let stored = service.add_banned_word(&admin(), GUILD_ID, "Foo").await.unwrap();
        assert_eq!(stored, "foo");

        let again = service.add_banned_word(&admin(), GUILD_ID, "FOO").await;
        assert!(matches!(again, Err(FilterConfigError::DuplicateWord)));

        let words = store.banned_words(GUILD_ID).await.unwrap();
        assert_eq!(words.iter().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[tokio::test]
    async fn test_owner_without_roles_is_allowed() {
        let (_store, service) = setup();
        let owner = Invoker {
            user_id: 3,
            role_names: vec![],
            is_guild_owner: true,
        };

        assert!(service.add_banned_word(&owner, GUILD_ID, "eggs").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_word_is_rejected() {
        let (_store, service) = setup();
        let result = service.add_banned_word(&admin(), GUILD_ID, "   ").await;
        assert!(matches!(result, Err(FilterConfigError::EmptyWord)));
    }

    #[tokio::test]
    async fn test_remove_word() {
        let (store, service) = setup();
        service.add_banned_word(&admin(), GUILD_ID, "spam").await.unwrap();

        let removed = service.remove_banned_word(&admin(), GUILD_ID, "SPAM").await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.banned_words(GUILD_ID).await.unwrap().is_empty());

        let missing = service.remove_banned_word(&admin(), GUILD_ID, "spam").await;
        assert!(matches!(missing, Err(FilterConfigError::WordNotFound)));
    }

    #[tokio::test]
    async fn test_list_requires_admin() {
        let (_store, service) = setup();
        service.add_banned_word(&admin(), GUILD_ID, "spam").await.unwrap();

        assert!(matches!(
            service.list_banned_words(&member(), GUILD_ID).await,
            Err(FilterConfigError::PermissionDenied)
        ));
        assert_eq!(service.list_banned_words(&admin(), GUILD_ID).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_media_filter_validates_type() {
        let (store, service) = setup();

        let result = service
            .set_media_filter(&admin(), GUILD_ID, CHANNEL_ID, "gifs", true)
            .await;
        assert!(matches!(result, Err(FilterConfigError::InvalidMediaType(_))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid media type. Choose from: images, videos, links, files, embeds"
        );
        assert_eq!(
            store.media_filters(GUILD_ID).await.unwrap(),
            GuildMediaFilters::default()
        );
    }

    #[tokio::test]
    async fn test_non_admin_cannot_set_media_filter() {
        let (store, service) = setup();

        let result = service
            .set_media_filter(&member(), GUILD_ID, CHANNEL_ID, "links", true)
            .await;

        assert!(matches!(result, Err(FilterConfigError::PermissionDenied)));
        assert!(store.channel_filters(GUILD_ID, CHANNEL_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabling_twice_leaves_content_unchanged() {
        let (store, service) = setup();

        service
            .set_media_filter(&admin(), GUILD_ID, CHANNEL_ID, "videos", false)
            .await
            .unwrap();
        let first = store.media_filters(GUILD_ID).await.unwrap();

        service
            .set_media_filter(&admin(), GUILD_ID, CHANNEL_ID, "videos", false)
            .await
            .unwrap();
        let second = store.media_filters(GUILD_ID).await.unwrap();

        assert_eq!(first, second);
        assert!(!second.channel(CHANNEL_ID).unwrap().is_enabled(MediaType::Videos));
    }

    #[tokio::test]
    async fn test_status_defaults_to_allowed() {
        let (_store, service) = setup();

        assert_eq!(
            service.media_filter_status(GUILD_ID, CHANNEL_ID).await.unwrap(),
            ChannelFilterStatus::Unconfigured
        );

        service
            .set_media_filter(&admin(), GUILD_ID, CHANNEL_ID, "embeds", true)
            .await
            .unwrap();

        let ChannelFilterStatus::Configured(flags) =
            service.media_filter_status(GUILD_ID, CHANNEL_ID).await.unwrap()
        else {
            panic!("channel should be configured");
        };
        assert_eq!(flags.len(), 5);
        assert_eq!(flags[4], (MediaType::Embeds, true));
        assert!(flags[..4].iter().all(|(_, filtered)| !filtered));
    }

    #[tokio::test]
    async fn test_every_mutation_is_persisted() {
        let (store, service) = setup();

        service.add_banned_word(&admin(), GUILD_ID, "a").await.unwrap();
        service.add_banned_word(&admin(), GUILD_ID, "b").await.unwrap();
        service.remove_banned_word(&admin(), GUILD_ID, "a").await.unwrap();
        service
            .set_media_filter(&admin(), GUILD_ID, CHANNEL_ID, "links", true)
            .await
            .unwrap();
        assert_eq!(store.storage().saves.load(Ordering::SeqCst), 4);

        // Rejected operations do not write
        let _ = service.add_banned_word(&admin(), GUILD_ID, "B").await;
        let _ = service.remove_banned_word(&admin(), GUILD_ID, "a").await;
        assert_eq!(store.storage().saves.load(Ordering::SeqCst), 4);

        let persisted = store.storage().words.get(&GUILD_ID).unwrap().clone();
        assert_eq!(persisted.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_retry_after_failed_save_is_not_a_duplicate() {
        let (store, service) = setup();
        store.storage().fail_saves.store(true, Ordering::SeqCst);

        let first = service.add_banned_word(&admin(), GUILD_ID, "spam").await;
        assert!(matches!(first, Err(FilterConfigError::Store(_))));
        assert!(!first.unwrap_err().is_rejection());

        store.storage().fail_saves.store(false, Ordering::SeqCst);
        let retry = service.add_banned_word(&admin(), GUILD_ID, "spam").await;
        assert_eq!(retry.unwrap(), "spam");

        let persisted = store.storage().words.get(&GUILD_ID).unwrap().clone();
        assert_eq!(persisted.iter().collect::<Vec<_>>(), vec!["spam"]);
    }
}
