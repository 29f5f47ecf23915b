use super::*;
use crate::commands::music::utils::embedded_messages;
use tracing::info;

/// Stops playing audio and leaves the voice channel.
///
/// This also clears the queue and turns autoplay off.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    if !data.coordinator.stop_guild(&data.autoplay, guild_id).await {
        info!("Stop requested for guild {} with no playback state", guild_id);
    }

    ctx.send(embedded_messages::stopped()).await?;

    Ok(())
}
