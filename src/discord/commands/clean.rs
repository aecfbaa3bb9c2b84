use crate::core::moderation::{plan_purge, validate_purge_amount};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Clean the channel from unwanted messages.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES"
)]
pub async fn clean(
    ctx: Context<'_>,
    #[description = "The amount of messages to purge (max 100)"] amount: i64,
) -> Result<(), Error> {
    let limit = match validate_purge_amount(amount) {
        Ok(limit) => limit,
        Err(e) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(e.to_string())
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    ctx.defer_ephemeral().await?;

    let http = &ctx.serenity_context().http;
    let channel_id = ctx.channel_id();
    let messages = channel_id
        .messages(http, serenity::GetMessages::new().limit(limit))
        .await?;
    let plan = plan_purge(
        messages
            .iter()
            .map(|m| (m.id.get(), m.id.created_at().unix_timestamp())),
        serenity::Timestamp::now().unix_timestamp(),
    );
    let bulk: Vec<serenity::MessageId> =
        plan.bulk.iter().copied().map(serenity::MessageId::new).collect();

    // Bulk delete needs at least two messages
    match bulk.as_slice() {
        [] => {}
        [single] => channel_id.delete_message(http, *single).await?,
        _ => channel_id.delete_messages(http, &bulk).await?,
    }
    let mut deleted = bulk.len();

    for id in plan.single {
        match channel_id
            .delete_message(http, serenity::MessageId::new(id))
            .await
        {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!(message_id = id, "Failed to delete old message: {}", e),
        }
    }

    tracing::info!(
        channel_id = channel_id.get(),
        user_id = ctx.author().id.get(),
        deleted,
        "Purged messages"
    );

    ctx.send(
        poise::CreateReply::default()
            .content(format!("Deleted {} message/s.", deleted))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
