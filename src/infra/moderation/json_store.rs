use crate::core::moderation::{
    BannedWordList, FilterStorage, FilterStoreError, GuildMediaFilters, Loaded,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MEDIA_FILTER_DIR: &str = "media_filters";
pub const WORD_LIST_DIR: &str = "filter_lists";

/// One JSON document per guild and per filter kind:
/// `media_filters/media_filter_<guild>.json` and
/// `filter_lists/filter_list_<guild>.json`.
pub struct JsonFilterStorage {
    media_dir: PathBuf,
    words_dir: PathBuf,
}

impl JsonFilterStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            media_dir: root.join(MEDIA_FILTER_DIR),
            words_dir: root.join(WORD_LIST_DIR),
        }
    }

    /// Create both storage directories if they don't exist yet.
    pub async fn init(&self) -> Result<(), FilterStoreError> {
        fs::create_dir_all(&self.media_dir).await?;
        fs::create_dir_all(&self.words_dir).await?;
        Ok(())
    }

    pub fn media_filter_path(&self, guild_id: u64) -> PathBuf {
        self.media_dir.join(format!("media_filter_{}.json", guild_id))
    }

    pub fn word_list_path(&self, guild_id: u64) -> PathBuf {
        self.words_dir.join(format!("filter_list_{}.json", guild_id))
    }

    async fn read_or_reset<T>(path: &Path) -> Result<Loaded<T>, FilterStoreError>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        match fs::read_to_string(path).await {
            Ok(text) => match serde_json::from_str::<T>(&text) {
                Ok(value) => return Ok(Loaded::Found(value)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Malformed filter document, resetting: {}", e)
                }
            },
            // Not valid UTF-8 counts as malformed content too
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!(path = %path.display(), "Unreadable filter document, resetting: {}", e)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No filter document yet")
            }
            Err(e) => return Err(e.into()),
        }

        let value = T::default();
        Self::write(path, &value).await?;
        Ok(Loaded::Recovered(value))
    }

    async fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), FilterStoreError> {
        let text = serde_json::to_string_pretty(value)?;
        fs::write(path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl FilterStorage for JsonFilterStorage {
    async fn load_media_filters(
        &self,
        guild_id: u64,
    ) -> Result<Loaded<GuildMediaFilters>, FilterStoreError> {
        Self::read_or_reset(&self.media_filter_path(guild_id)).await
    }

    async fn load_word_list(
        &self,
        guild_id: u64,
    ) -> Result<Loaded<BannedWordList>, FilterStoreError> {
        Self::read_or_reset(&self.word_list_path(guild_id)).await
    }

    async fn save_media_filters(
        &self,
        guild_id: u64,
        filters: &GuildMediaFilters,
    ) -> Result<(), FilterStoreError> {
        Self::write(&self.media_filter_path(guild_id), filters).await
    }

    async fn save_word_list(
        &self,
        guild_id: u64,
        words: &BannedWordList,
    ) -> Result<(), FilterStoreError> {
        Self::write(&self.word_list_path(guild_id), words).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::{FilterStore, MediaType};
    use tempfile::TempDir;

    async fn storage() -> (TempDir, JsonFilterStorage) {
        let dir = TempDir::new().unwrap();
        let storage = JsonFilterStorage::new(dir.path());
        storage.init().await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_init_creates_directories() {
        let (dir, _storage) = storage().await;
        assert!(dir.path().join("media_filters").is_dir());
        assert!(dir.path().join("filter_lists").is_dir());
    }

    #[tokio::test]
    async fn test_missing_documents_are_created_empty() {
        let (_dir, storage) = storage().await;

        let media = storage.load_media_filters(1).await.unwrap();
        let words = storage.load_word_list(1).await.unwrap();

        assert_eq!(media, Loaded::Recovered(GuildMediaFilters::default()));
        assert_eq!(words, Loaded::Recovered(BannedWordList::default()));
        assert_eq!(
            std::fs::read_to_string(storage.media_filter_path(1)).unwrap(),
            "{}"
        );
        assert_eq!(
            std::fs::read_to_string(storage.word_list_path(1)).unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn test_corrupt_word_list_is_reset() {
        let (_dir, storage) = storage().await;
        std::fs::write(storage.word_list_path(9), "[\"spam\", oops").unwrap();

        let words = storage.load_word_list(9).await.unwrap();

        assert!(words.was_recovered());
        assert!(words.into_inner().is_empty());
        assert_eq!(
            std::fs::read_to_string(storage.word_list_path(9)).unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn test_wrong_shape_counts_as_corrupt() {
        let (_dir, storage) = storage().await;
        std::fs::write(storage.media_filter_path(9), "[1, 2, 3]").unwrap();

        let media = storage.load_media_filters(9).await.unwrap();
        assert_eq!(media, Loaded::Recovered(GuildMediaFilters::default()));
    }

    #[tokio::test]
    async fn test_reads_existing_documents() {
        let (_dir, storage) = storage().await;
        std::fs::write(
            storage.media_filter_path(5),
            r#"{ "100": { "images": true, "links": false } }"#,
        )
        .unwrap();
        std::fs::write(storage.word_list_path(5), r#"["spam", "eggs"]"#).unwrap();

        let media = storage.load_media_filters(5).await.unwrap();
        assert!(!media.was_recovered());
        let media = media.into_inner();
        let channel = media.channel(100).unwrap();
        assert!(channel.is_enabled(MediaType::Images));
        assert!(!channel.is_enabled(MediaType::Links));

        let words = storage.load_word_list(5).await.unwrap().into_inner();
        assert_eq!(words.iter().collect::<Vec<_>>(), vec!["spam", "eggs"]);
    }

    #[tokio::test]
    async fn test_roundtrip_across_restart() {
        let (dir, storage) = storage().await;
        let store = FilterStore::new(storage);

        store
            .update_media_filters(3, |f| {
                f.set(77, MediaType::Embeds, true);
                Ok::<_, FilterStoreError>(())
            })
            .await
            .unwrap();
        store
            .update_word_list(3, |w| {
                w.insert("Spam");
                Ok::<_, FilterStoreError>(())
            })
            .await
            .unwrap();
        let media_before = store.media_filters(3).await.unwrap();
        let words_before = store.banned_words(3).await.unwrap();

        // A fresh store over the same directory sees the same data
        let reloaded = FilterStore::new(JsonFilterStorage::new(dir.path()));
        assert_eq!(reloaded.media_filters(3).await.unwrap(), media_before);
        assert_eq!(reloaded.banned_words(3).await.unwrap(), words_before);
        assert_eq!(
            words_before.iter().collect::<Vec<_>>(),
            vec!["spam"]
        );
    }

    #[tokio::test]
    async fn test_unreadable_document_is_not_overwritten() {
        let (_dir, storage) = storage().await;
        let path = storage.word_list_path(4);
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "x").unwrap();

        let result = storage.load_word_list(4).await;

        assert!(matches!(result, Err(FilterStoreError::Io(_))));
        assert!(path.is_dir());
        assert_eq!(std::fs::read_to_string(path.join("keep.txt")).unwrap(), "x");
    }
}
