use super::*;
use crate::commands::music::utils::embedded_messages;

/// Lists the songs waiting to be played.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;

    let descriptions = state.pending_descriptions().await;
    chunk_response(ctx, embedded_messages::queue_listing(&descriptions)).await
}
