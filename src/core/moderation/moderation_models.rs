// Moderation domain models - data structures for the message filters.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts serenity messages into `MessageSnapshot`
// and turns a `FilterAction` back into deletes and notices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of the guild role that may configure filters (besides the owner).
pub const ADMIN_ROLE_NAME: &str = "Admin";

/// One of the five media categories a channel can filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Images,
    Videos,
    Links,
    Files,
    Embeds,
}

impl MediaType {
    /// Every media type, in the order the classifier checks them.
    pub const ALL: [MediaType; 5] = [
        MediaType::Images,
        MediaType::Videos,
        MediaType::Links,
        MediaType::Files,
        MediaType::Embeds,
    ];

    /// Canonical identifier, also used as the key in stored documents.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Images => "images",
            MediaType::Videos => "videos",
            MediaType::Links => "links",
            MediaType::Files => "files",
            MediaType::Embeds => "embeds",
        }
    }

    /// Capitalized name for user-facing text.
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Images => "Images",
            MediaType::Videos => "Videos",
            MediaType::Links => "Links",
            MediaType::Files => "Files",
            MediaType::Embeds => "Embeds",
        }
    }

    /// Comma separated list of every identifier ("images, videos, ...").
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown media type: {0}")]
pub struct UnknownMediaType(pub String);

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownMediaType(s.to_string()))
    }
}

/// Per-type enabled flags for one channel.
///
/// Stored as `{ "images": true, "links": false }`. A type missing from the
/// map counts as disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelMediaFilters(BTreeMap<String, bool>);

impl ChannelMediaFilters {
    pub fn is_enabled(&self, media_type: MediaType) -> bool {
        self.0.get(media_type.as_str()).copied().unwrap_or(false)
    }

    pub fn set(&mut self, media_type: MediaType, enabled: bool) {
        self.0.insert(media_type.as_str().to_string(), enabled);
    }
}

/// Media filter settings for a whole guild, keyed by channel id string.
///
/// A channel without an entry is not media-filtered at all, which is not
/// the same as an entry whose types are all disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildMediaFilters {
    channels: BTreeMap<String, ChannelMediaFilters>,
}

impl GuildMediaFilters {
    pub fn channel(&self, channel_id: u64) -> Option<&ChannelMediaFilters> {
        self.channels.get(&channel_id.to_string())
    }

    /// Upsert a flag, creating the channel entry on first use.
    pub fn set(&mut self, channel_id: u64, media_type: MediaType, enabled: bool) {
        self.channels
            .entry(channel_id.to_string())
            .or_default()
            .set(media_type, enabled);
    }
}

/// Ordered list of lowercase banned words for a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BannedWordList(Vec<String>);

impl BannedWordList {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_ignore_case(&self, word: &str) -> bool {
        let needle = word.to_lowercase();
        self.0.iter().any(|w| w.to_lowercase() == needle)
    }

    /// Append the lowercase form of `word`. Returns `false` (and leaves the
    /// list untouched) when an equal word is already present.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.contains_ignore_case(word) {
            return false;
        }
        self.0.push(word.to_lowercase());
        true
    }

    /// Remove every entry equal to `word` ignoring case. Returns how many
    /// entries were removed.
    pub fn remove(&mut self, word: &str) -> usize {
        let needle = word.to_lowercase();
        let before = self.0.len();
        self.0.retain(|w| w.to_lowercase() != needle);
        before - self.0.len()
    }
}

impl From<Vec<String>> for BannedWordList {
    fn from(words: Vec<String>) -> Self {
        Self(words)
    }
}

/// An attachment as seen by the filters. Only the MIME type matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub content_type: Option<String>,
}

impl AttachmentInfo {
    pub fn new(content_type: Option<&str>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
        }
    }
}

/// Platform-independent view of an incoming message.
#[derive(Debug, Clone, Default)]
pub struct MessageSnapshot {
    pub author_id: u64,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub content: String,
    pub attachments: Vec<AttachmentInfo>,
    /// Number of rich embeds carried by the message.
    pub embed_count: usize,
}

/// What should happen to a message after running the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Message passes every filter
    None,
    /// Delete because of media; lists the triggered types in check order
    DeleteForMedia { media_types: Vec<MediaType> },
    /// Delete because of banned words, in banned-list order
    DeleteForWords { words: Vec<String> },
}

impl FilterAction {
    /// Text of the transient notice shown after deleting the message.
    pub fn notice(&self, author_id: u64) -> Option<String> {
        match self {
            FilterAction::None => None,
            FilterAction::DeleteForMedia { media_types } => {
                let types = media_types
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!(
                    "<@{}>, your message was deleted because {} are not allowed in this channel.",
                    author_id, types
                ))
            }
            FilterAction::DeleteForWords { words } => Some(format!(
                "<@{}>, your message was deleted for containing the following banned word/s: {}",
                author_id,
                words.join(", ")
            )),
        }
    }
}

/// The user invoking a filter configuration command.
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    pub user_id: u64,
    /// Names of the guild roles the user holds
    pub role_names: Vec<String>,
    pub is_guild_owner: bool,
}

impl Invoker {
    pub fn can_configure_filters(&self) -> bool {
        self.is_guild_owner || self.role_names.iter().any(|r| r == ADMIN_ROLE_NAME)
    }
}

/// Media filter state of one channel, for the status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFilterStatus {
    /// No stored entry for the channel
    Unconfigured,
    /// Every media type with its filtered flag, in check order
    Configured(Vec<(MediaType, bool)>),
}
