use super::*;
use crate::commands::music::utils::embedded_messages;

/// Removes a song from the queue, by its position or by words from its description.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[rest]
    #[description = "Position in the queue (1-based), or words matching the song"]
    target: String,
) -> CommandResult {
    let state = guild_state(ctx)?;
    let target = target.trim();

    let removed = if !target.is_empty() && target.chars().all(|c| c.is_ascii_digit()) {
        match target.parse::<usize>() {
            Ok(position) => state.remove_at(position).await,
            // Too many digits to be a position in any queue
            Err(_) => Err(MusicError::OutOfRange {
                position: usize::MAX,
                len: state.pending_len().await,
            }),
        }
    } else {
        state.remove_matching(target).await
    };

    match removed {
        Ok(entry) => ctx.send(embedded_messages::removed(&entry)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
