// Bot stats command - latency and memory usage of the running process.

use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::{Duration, Instant};

/// Shows latency and RAM usage
#[poise::command(slash_command)]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    ctx.defer().await?;
    let api_latency = started.elapsed();

    let websocket_latency = format_websocket_latency(ctx.ping().await);
    let memory = match process_memory_mb() {
        Some(mb) => format!("{:.2} MB", mb),
        None => "Unavailable".to_string(),
    };

    let embed = serenity::CreateEmbed::new()
        .title("Bot Stats")
        .description("Current performance statistics")
        .color(serenity::Colour::LIGHT_GREY)
        .field("API Latency", format!("{} ms", api_latency.as_millis()), true)
        .field("WebSocket Latency", websocket_latency, true)
        .field("Memory Usage", memory, true)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Requested by {}",
            ctx.author().name
        )))
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// The gateway reports zero until the first heartbeat is acknowledged.
fn format_websocket_latency(latency: Duration) -> String {
    if latency.is_zero() {
        "Calculating...".to_string()
    } else {
        format!("{} ms", latency.as_millis())
    }
}

/// Resident memory of this process in megabytes.
fn process_memory_mb() -> Option<f64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = sysinfo::System::new();
    system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);
    system
        .process(pid)
        .map(|process| process.memory() as f64 / 1024.0 / 1024.0)
}
