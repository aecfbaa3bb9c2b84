use crate::discord::moderation::commands::chunk_lines;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::collections::BTreeMap;

// Category definitions with emojis and order
const CATEGORY_ORDER: &[&str] = &["Moderation", "Fun", "Miscellaneous"];

fn get_category_emoji(category: &str) -> &'static str {
    match category {
        "Moderation" => "👮",
        "Fun" => "😆",
        "Miscellaneous" => "🎲",
        _ => "•",
    }
}

fn get_command_category(name: &str) -> &'static str {
    match name {
        "media_filter" | "media_filter_status" | "filter_add" | "filter_remove"
        | "filter_list" | "clean" => "Moderation",
        "coinflip" | "magic_8_ball" => "Fun",
        _ => "Miscellaneous",
    }
}

/// Build `(category, lines)` pairs from `(name, description)` pairs.
fn group_commands<'a>(
    commands: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
) -> Vec<(&'static str, Vec<String>)> {
    let mut categories: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

    for (name, description) in commands {
        if name == "help" {
            continue;
        }

        let description = description.unwrap_or("No description provided.");
        categories
            .entry(get_command_category(name))
            .or_default()
            .push(format!("• **/{}** - {}", name, description));
    }

    let mut grouped: Vec<_> = categories.into_iter().collect();
    grouped.sort_by_key(|(category, _)| {
        CATEGORY_ORDER
            .iter()
            .position(|c| c == category)
            .unwrap_or(usize::MAX)
    });
    grouped
}

/// Shows a list of commands.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let commands = &ctx.framework().options().commands;
    let grouped = group_commands(
        commands
            .iter()
            .filter(|c| !c.hide_in_help)
            .map(|c| (c.name.as_str(), c.description.as_deref())),
    );

    let mut embed = serenity::CreateEmbed::new()
        .title("Bot Commands")
        .description("Here are all the available commands for this bot:")
        .color(serenity::Colour::from_rgb(88, 101, 242))
        .timestamp(serenity::Timestamp::now());

    for (category, entries) in grouped {
        let title = format!("{} {}", get_category_emoji(category), category);

        for (i, chunk) in chunk_lines(&entries).iter().enumerate() {
            let field_name = if i == 0 {
                title.clone()
            } else {
                format!("{} (cont.)", title)
            };
            embed = embed.field(field_name, chunk.join("\n"), false);
        }
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
