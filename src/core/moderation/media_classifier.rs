// Media classifier - decides which enabled media types a message contains.
//
// The rules form an ordered table of (type, predicate) pairs. Every enabled
// rule that matches contributes its type, so several types can trigger at
// once and are reported in table order.

use super::moderation_models::{ChannelMediaFilters, MediaType, MessageSnapshot};

type MediaRule = (MediaType, fn(&MessageSnapshot) -> bool);

const MEDIA_RULES: [MediaRule; 5] = [
    (MediaType::Images, has_image_attachment),
    (MediaType::Videos, has_video_attachment),
    (MediaType::Links, has_link),
    (MediaType::Files, has_generic_attachment),
    (MediaType::Embeds, has_embed),
];

/// Media types that are both enabled for the channel and present in the
/// message. An empty result means the message passes the media filter.
pub fn classify(message: &MessageSnapshot, filters: &ChannelMediaFilters) -> Vec<MediaType> {
    MEDIA_RULES
        .iter()
        .filter(|(media_type, _)| filters.is_enabled(*media_type))
        .filter(|(_, matches)| matches(message))
        .map(|(media_type, _)| *media_type)
        .collect()
}

fn content_type_starts_with(content_type: Option<&str>, prefix: &str) -> bool {
    content_type.is_some_and(|ct| ct.starts_with(prefix))
}

fn has_image_attachment(message: &MessageSnapshot) -> bool {
    message
        .attachments
        .iter()
        .any(|a| content_type_starts_with(a.content_type.as_deref(), "image/"))
}

fn has_video_attachment(message: &MessageSnapshot) -> bool {
    message
        .attachments
        .iter()
        .any(|a| content_type_starts_with(a.content_type.as_deref(), "video/"))
}

fn has_link(message: &MessageSnapshot) -> bool {
    message.content.contains("http://") || message.content.contains("https://")
}

// Anything that is not recognisably an image or a video, including
// attachments without a content type.
fn has_generic_attachment(message: &MessageSnapshot) -> bool {
    message.attachments.iter().any(|a| {
        let ct = a.content_type.as_deref();
        !(content_type_starts_with(ct, "image/") || content_type_starts_with(ct, "video/"))
    })
}

fn has_embed(message: &MessageSnapshot) -> bool {
    message.embed_count > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::moderation_models::AttachmentInfo;

    fn filters(enabled: &[(MediaType, bool)]) -> ChannelMediaFilters {
        let mut filters = ChannelMediaFilters::default();
        for (media_type, on) in enabled {
            filters.set(*media_type, *on);
        }
        filters
    }

    fn message(content: &str, content_types: &[Option<&str>], embed_count: usize) -> MessageSnapshot {
        MessageSnapshot {
            author_id: 1,
            guild_id: Some(2),
            channel_id: 3,
            content: content.to_string(),
            attachments: content_types.iter().map(|ct| AttachmentInfo::new(*ct)).collect(),
            embed_count,
        }
    }

    #[test]
    fn test_link_is_flagged_when_enabled() {
        let f = filters(&[(MediaType::Links, true)]);
        let msg = message("check http://example.com", &[], 0);
        assert_eq!(classify(&msg, &f), vec![MediaType::Links]);

        let msg = message("plain text", &[], 0);
        assert!(classify(&msg, &f).is_empty());
    }

    #[test]
    fn test_pdf_passes_when_only_images_are_filtered() {
        let f = filters(&[(MediaType::Images, true), (MediaType::Files, false)]);
        let msg = message("", &[Some("application/pdf")], 0);
        assert!(classify(&msg, &f).is_empty());
    }

    #[test]
    fn test_attachment_without_content_type_is_a_file() {
        let f = filters(&[(MediaType::Files, true), (MediaType::Images, true)]);
        let msg = message("", &[None], 0);
        assert_eq!(classify(&msg, &f), vec![MediaType::Files]);
    }

    #[test]
    fn test_images_and_videos_are_not_files() {
        let f = filters(&[(MediaType::Files, true)]);
        let msg = message("", &[Some("image/png"), Some("video/mp4")], 0);
        assert!(classify(&msg, &f).is_empty());
    }

    #[test]
    fn test_multiple_types_reported_in_check_order() {
        let f = filters(&[
            (MediaType::Embeds, true),
            (MediaType::Links, true),
            (MediaType::Images, true),
            (MediaType::Videos, true),
            (MediaType::Files, true),
        ]);
        let msg = message(
            "see https://example.com",
            &[Some("video/webm"), Some("image/gif"), Some("text/plain")],
            1,
        );
        assert_eq!(classify(&msg, &f), MediaType::ALL.to_vec());
    }

    #[test]
    fn test_disabled_types_never_trigger() {
        let f = filters(&[
            (MediaType::Images, false),
            (MediaType::Links, false),
            (MediaType::Embeds, false),
        ]);
        let msg = message("https://example.com", &[Some("image/png")], 2);
        assert!(classify(&msg, &f).is_empty());
    }
}
