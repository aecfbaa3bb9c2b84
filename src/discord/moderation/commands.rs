// Filter configuration slash commands.
//
// Extract the invoker, guild and channel from Discord, call the config
// service, and turn the result into a reply. Rejections (permission, bad
// input) are ephemeral; storage failures bubble up to `on_error`.

use crate::core::moderation::{ChannelFilterStatus, FilterConfigError, Invoker, MediaType};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const LIST_PERMISSION_DENIED: &str =
    "You need to be the server owner or have the Admin role to view the filter list.";

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum MediaTypeChoice {
    #[name = "Images"]
    Images,
    #[name = "Videos"]
    Videos,
    #[name = "Links"]
    Links,
    #[name = "Files"]
    Files,
    #[name = "Embeds"]
    Embeds,
}

impl From<MediaTypeChoice> for MediaType {
    fn from(choice: MediaTypeChoice) -> Self {
        match choice {
            MediaTypeChoice::Images => MediaType::Images,
            MediaTypeChoice::Videos => MediaType::Videos,
            MediaTypeChoice::Links => MediaType::Links,
            MediaTypeChoice::Files => MediaType::Files,
            MediaTypeChoice::Embeds => MediaType::Embeds,
        }
    }
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum FilterToggle {
    #[name = "On"]
    On,
    #[name = "Off"]
    Off,
}

/// Resolve the invoking member's role names and ownership.
async fn invoker(ctx: Context<'_>) -> Result<Invoker, Error> {
    let member = ctx
        .author_member()
        .await
        .ok_or("Could not resolve your server membership")?;

    let guild = ctx.guild().ok_or("Guild not found in cache")?;
    let role_names = member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .map(|role| role.name.clone())
        .collect();

    Ok(Invoker {
        user_id: ctx.author().id.get(),
        role_names,
        is_guild_owner: guild.owner_id == ctx.author().id,
    })
}

async fn say_ephemeral(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Reply with a rejection, or propagate storage failures.
async fn reject(ctx: Context<'_>, err: FilterConfigError) -> Result<(), Error> {
    if !err.is_rejection() {
        return Err(err.into());
    }
    say_ephemeral(ctx, err.to_string()).await
}

/// Toggle filtering of specific media types in this channel.
#[poise::command(slash_command, guild_only)]
pub async fn media_filter(
    ctx: Context<'_>,
    #[description = "The type of media to filter (images, videos, links, files, embeds)"]
    media_type: MediaTypeChoice,
    #[description = "Turn the filter on or off"] action: FilterToggle,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?.get();
    let channel_id = ctx.channel_id().get();
    let invoker = invoker(ctx).await?;
    let enabled = matches!(action, FilterToggle::On);

    let result = ctx
        .data()
        .filter_config
        .set_media_filter(
            &invoker,
            guild_id,
            channel_id,
            MediaType::from(media_type).as_str(),
            enabled,
        )
        .await;

    match result {
        Ok(media_type) => {
            let status = if enabled { "enabled" } else { "disabled" };
            ctx.say(format!(
                "{} filtering has been {} in this channel.",
                media_type.label(),
                status
            ))
            .await?;
            Ok(())
        }
        Err(e) => reject(ctx, e).await,
    }
}

/// Show the current media filter settings for this channel.
#[poise::command(slash_command, guild_only)]
pub async fn media_filter_status(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?.get();
    let channel_id = ctx.channel_id();

    let status = ctx
        .data()
        .filter_config
        .media_filter_status(guild_id, channel_id.get())
        .await?;

    let settings = match status {
        ChannelFilterStatus::Unconfigured => {
            "No media filters are active in this channel.".to_string()
        }
        ChannelFilterStatus::Configured(flags) => flags
            .iter()
            .map(|(media_type, filtered)| {
                let state = if *filtered {
                    "🔴 Filtered"
                } else {
                    "🟢 Allowed"
                };
                format!("**{}**: {}", media_type.label(), state)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let channel_name = match channel_id.name(ctx.serenity_context()).await {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!("Could not resolve channel name: {}", e);
            channel_id.to_string()
        }
    };

    let embed = serenity::CreateEmbed::new()
        .title(status_title(&channel_name))
        .description("Current media filter settings for this channel:")
        .color(serenity::Color::BLUE)
        .field("Settings", settings, false)
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Add a word to the list of filtered words.
#[poise::command(slash_command, guild_only)]
pub async fn filter_add(
    ctx: Context<'_>,
    #[description = "The word to add to the filter list"] word: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?.get();
    let invoker = invoker(ctx).await?;

    match ctx
        .data()
        .filter_config
        .add_banned_word(&invoker, guild_id, &word)
        .await
    {
        Ok(_) => say_ephemeral(ctx, format!("Added '{}' to the filter list.", word)).await,
        Err(e) => reject(ctx, e).await,
    }
}

/// Remove a word from the list of filtered words.
#[poise::command(slash_command, guild_only)]
pub async fn filter_remove(
    ctx: Context<'_>,
    #[description = "The word to remove from the filter list"] word: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?.get();
    let invoker = invoker(ctx).await?;

    match ctx
        .data()
        .filter_config
        .remove_banned_word(&invoker, guild_id, &word)
        .await
    {
        Ok(_) => say_ephemeral(ctx, format!("Removed '{}' from the filter list.", word)).await,
        Err(e) => reject(ctx, e).await,
    }
}

/// Show the current list of filtered words.
#[poise::command(slash_command, guild_only)]
pub async fn filter_list(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?.get();
    let invoker = invoker(ctx).await?;

    let words = match ctx
        .data()
        .filter_config
        .list_banned_words(&invoker, guild_id)
        .await
    {
        Ok(words) => words,
        Err(FilterConfigError::PermissionDenied) => {
            return say_ephemeral(ctx, LIST_PERMISSION_DENIED).await;
        }
        Err(e) => return reject(ctx, e).await,
    };

    let mut embed = serenity::CreateEmbed::new()
        .title("Filtered Words")
        .description("These words are currently filtered from this server.")
        .timestamp(serenity::Timestamp::now());

    if words.is_empty() {
        embed = embed.field("Words", "No filtered words", true);
    } else {
        let lines: Vec<String> = words.iter().cloned().collect();
        for (i, chunk) in chunk_lines(&lines).iter().enumerate() {
            let name = if i == 0 { "Words" } else { "Words (cont.)" };
            embed = embed.field(name, chunk.join("\n"), true);
        }
    }

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

fn status_title(channel_name: &str) -> String {
    format!("Media Filter Status for #{}", channel_name)
}

/// Split lines into groups that fit in one embed field (1024 chars).
pub(crate) fn chunk_lines(lines: &[String]) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();
    let mut current_length = 0;

    for line in lines {
        // Leave a bit of buffer under the field limit
        if current_length + line.len() + 1 > 1000 && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_length = 0;
        }

        current.push(line.clone());
        current_length += line.len() + 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
