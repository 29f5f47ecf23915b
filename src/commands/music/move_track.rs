use super::*;
use crate::commands::music::utils::embedded_messages;

/// Moves a queued song to another position.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    rename = "move"
)]
pub async fn move_track(
    ctx: Context<'_>,
    #[description = "Current position of the song (1-based)"] from: usize,
    #[description = "New position of the song (1-based)"] to: usize,
) -> CommandResult {
    let state = guild_state(ctx)?;

    match state.move_entry(from, to).await {
        Ok(()) => ctx.send(embedded_messages::moved(from, to)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
