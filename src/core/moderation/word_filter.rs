// Word filter - case-insensitive substring matching against banned words.

use super::moderation_models::BannedWordList;

/// Banned words found anywhere in `content`, in banned-list order.
///
/// Matching is on raw substrings, so "ass" also matches "assassin".
/// Empty entries never match.
pub fn find_banned_words(content: &str, banned: &BannedWordList) -> Vec<String> {
    let haystack = content.to_lowercase();
    banned
        .iter()
        .filter(|word| !word.is_empty() && haystack.contains(&word.to_lowercase()))
        .cloned()
        .collect()
}
