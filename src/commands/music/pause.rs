use super::*;
use crate::commands::music::utils::embedded_messages;

/// Pauses the currently played song.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;

    match state.pause().await {
        Ok(()) => ctx.send(embedded_messages::paused()).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}

/// Resumes the currently played song.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;

    match state.resume().await {
        Ok(()) => ctx.send(embedded_messages::resumed()).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
