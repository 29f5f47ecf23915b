use super::*;
use crate::commands::music::utils::embedded_messages;
use tracing::{info, warn};

/// Plays a song.
///
/// If a song is already playing, the new one is queued until the ones before
/// it are done. Anything that isn't a URL is searched on YouTube.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[rest]
    #[description = "URL or search query"]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let state = guild_state(ctx)?;

    // Defer the response since joining and resolving the query might take time
    ctx.defer().await?;

    // Join the author's voice channel if not already connected
    if !state.is_connected().await {
        if let Err(err) = summon_author(ctx, &state).await {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    }

    let data = ctx.data();
    let result = state
        .enqueue_query(
            data.resolver.as_ref(),
            &query,
            author_requester(ctx),
            ctx.channel_id(),
        )
        .await;

    match result {
        Ok((entry, _)) => {
            ctx.send(embedded_messages::enqueued(&entry)).await?;

            if let Err(err) = data.history.record(&query).await {
                warn!("Failed to record '{}' in song history: {}", query, err);
                ctx.send(embedded_messages::history_write_failed(&err))
                    .await?;
            }
        }
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
        }
    }

    Ok(())
}
