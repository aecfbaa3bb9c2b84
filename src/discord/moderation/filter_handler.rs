// Discord-specific filter handling - translates core filter decisions to Discord actions.

use crate::core::moderation::{
    AttachmentInfo, FilterAction, FilterStorage, MessageFilterService, MessageSnapshot,
};
use crate::discord::Error;
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// How long a deletion notice stays in the channel.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(10);

/// Convert a serenity message into the platform-independent snapshot.
pub fn snapshot_message(msg: &serenity::Message) -> MessageSnapshot {
    MessageSnapshot {
        author_id: msg.author.id.get(),
        guild_id: msg.guild_id.map(|id| id.get()),
        channel_id: msg.channel_id.get(),
        content: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| AttachmentInfo::new(a.content_type.as_deref()))
            .collect(),
        embed_count: msg.embeds.len(),
    }
}

/// Run the media and word filters on a message and apply the result.
///
/// Returns `true` if the message was filtered. Delete and notice failures
/// are logged and swallowed; only storage errors are returned.
pub async fn handle_message_for_filters<S: FilterStorage>(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    filters: &MessageFilterService<S>,
) -> Result<bool, Error> {
    let bot_id = ctx.cache.current_user().id.get();
    let snapshot = snapshot_message(msg);

    let action = filters.check_message(&snapshot, bot_id).await?;
    let Some(notice) = action.notice(snapshot.author_id) else {
        return Ok(false);
    };

    match &action {
        FilterAction::None => {}

        FilterAction::DeleteForMedia { media_types } => {
            let types = media_types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            // The notice is only posted once the message is actually gone
            match msg.delete(&ctx.http).await {
                Ok(()) => {
                    tracing::info!(
                        guild_id = snapshot.guild_id,
                        channel_id = snapshot.channel_id,
                        "Deleted message containing filtered media types: {}",
                        types
                    );
                    send_transient_notice(ctx, msg.channel_id, notice).await;
                }
                Err(e) => {
                    tracing::warn!("Failed to delete message containing filtered media: {}", e)
                }
            }
        }

        FilterAction::DeleteForWords { words } => {
            match msg.delete(&ctx.http).await {
                Ok(()) => tracing::info!(
                    guild_id = snapshot.guild_id,
                    channel_id = snapshot.channel_id,
                    "Deleted message containing banned words: {}",
                    words.join(", ")
                ),
                Err(e) => tracing::warn!("Failed to delete message with banned words: {}", e),
            }

            send_transient_notice(ctx, msg.channel_id, notice).await;
        }
    }

    Ok(true)
}

/// Post a notice and remove it again after `NOTICE_LIFETIME`.
async fn send_transient_notice(ctx: &serenity::Context, channel_id: serenity::ChannelId, text: String) {
    let notice = match channel_id.say(&ctx.http, text).await {
        Ok(notice) => notice,
        Err(e) => {
            tracing::warn!("Failed to send filter notice: {}", e);
            return;
        }
    };

    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(NOTICE_LIFETIME).await;
        if let Err(e) = notice.delete(&http).await {
            tracing::debug!("Failed to remove filter notice: {}", e);
        }
    });
}
