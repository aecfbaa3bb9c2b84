// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Filter rules and config operations (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON files on disk)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::moderation::{FilterConfigService, FilterStore, MessageFilterService};
use crate::discord::commands::presence;
use crate::discord::moderation::filter_handler::handle_message_for_filters;
use crate::discord::{Data, Error};
use crate::infra::moderation::JsonFilterStorage;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

const DEFAULT_DATA_DIR: &str = "data";

/// Event handler for non-command Discord events.
/// Every guild message goes through the media and word filters.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if let Err(e) = handle_message_for_filters(ctx, new_message, &*data.filters).await {
            tracing::error!(
                message_id = new_message.id.get(),
                channel_id = new_message.channel_id.get(),
                "Error running message filters: {}",
                e
            );
        }
    }

    Ok(())
}

/// Log command failures and tell the invoker something went wrong.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                user_id = ctx.author().id.get(),
                "Command failed: {}",
                error
            );
            let reply = poise::CreateReply::default()
                .content("Something went wrong while running this command.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::warn!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let token = std::env::var("DISCORD_TOKEN").context(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    )?;

    // Filter documents live under <DATA_DIR>/media_filters and <DATA_DIR>/filter_lists
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

    // Optional guild for instant command registration during development
    let dev_guild_id = std::env::var("DEV_GUILD_ID")
        .ok()
        .map(|v| v.parse::<u64>())
        .transpose()
        .context("DEV_GUILD_ID must be a numeric guild id")?
        .filter(|id| *id != 0);

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // One store shared by the message filter and the config commands, so a
    // config change applies to the next message immediately.

    let storage = JsonFilterStorage::new(&data_dir);
    storage
        .init()
        .await
        .with_context(|| format!("Failed to create filter directories under {}", data_dir))?;

    let filter_store = Arc::new(FilterStore::new(storage));
    let data = Data {
        filters: Arc::new(MessageFilterService::new(Arc::clone(&filter_store))),
        filter_config: Arc::new(FilterConfigService::new(Arc::clone(&filter_store))),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        command = %ctx.command().qualified_name,
                        user_id = ctx.author().id.get(),
                        guild_id = ctx.guild_id().map(|id| id.get()),
                        "Running command"
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!(command = %ctx.command().qualified_name, "Command finished");
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up as {}", ready.user.name);

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                if let Some(guild_id) = dev_guild_id {
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        serenity::GuildId::new(guild_id),
                    )
                    .await?;
                    tracing::info!(guild_id, "Commands registered in development guild");
                }

                tracing::info!("Commands registered, bot is ready");
                presence::on_ready(ctx);

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
