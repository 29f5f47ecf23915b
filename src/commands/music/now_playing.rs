use super::*;
use crate::commands::music::utils::embedded_messages;

/// Shows info about the currently played song.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    rename = "now-playing",
    aliases("np")
)]
pub async fn now_playing(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;

    let current = state.current().await;
    let votes = state.skip_vote_count().await;
    ctx.send(embedded_messages::now_playing(
        current.as_ref(),
        votes,
        state.skip_threshold(),
    ))
    .await?;

    Ok(())
}
