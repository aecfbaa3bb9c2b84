// Fun commands: coin flips and the magic 8 ball.

use crate::core::fun::{flip_coin, magic_8_ball};
use crate::discord::{Context, Error};

/// Flip a coin! Let destiny decide.
#[poise::command(slash_command)]
pub async fn coinflip(ctx: Context<'_>) -> Result<(), Error> {
    // Pick before awaiting, the thread rng is not Send
    let side = flip_coin(&mut rand::thread_rng());

    ctx.say("🪙 Flipping a coin...").await?;
    ctx.say(side.outcome_text()).await?;
    Ok(())
}

/// Get predictions about the future, 100% trustworthy
#[poise::command(slash_command, rename = "magic_8_ball")]
pub async fn magic_8_ball_command(
    ctx: Context<'_>,
    #[description = "What would you like to know?"] message: Option<String>,
) -> Result<(), Error> {
    let reply = magic_8_ball(&mut rand::thread_rng(), message.as_deref());
    ctx.say(reply).await?;
    Ok(())
}
