//! Defines the `start-autoplay` and `stop-autoplay` commands.

use super::*;
use crate::commands::music::utils::{autoplay_manager::AutoplayJob, embedded_messages};

/// Keeps the queue filled with songs people requested before.
///
/// While fewer than three songs are queued, a random song from the history is
/// queued on the bot's behalf. Anyone can skip those.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    rename = "start-autoplay",
    aliases("startautoplay")
)]
pub async fn start_autoplay(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;

    // Joining the voice channel can outlast the interaction deadline
    ctx.defer().await?;

    if !state.is_connected().await {
        if let Err(err) = summon_author(ctx, &state).await {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    }

    let data = ctx.data();
    let job = AutoplayJob {
        state,
        resolver: Arc::clone(&data.resolver),
        history: Arc::clone(&data.history),
        announcer: Arc::clone(&data.announcer),
        bot: bot_requester(ctx),
        channel_id: ctx.channel_id(),
    };
    data.autoplay.start(job).await;

    let required = data.autoplay.settings().min_history;
    if data.history.distinct().await.len() < required {
        ctx.send(embedded_messages::not_enough_history(required))
            .await?;
    } else {
        ctx.send(embedded_messages::autoplay_started()).await?;
    }

    Ok(())
}

/// Stops autoplay from queueing more songs.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    rename = "stop-autoplay",
    aliases("stopautoplaylist")
)]
pub async fn stop_autoplay(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let was_running = ctx.data().autoplay.stop(guild_id).await;
    ctx.send(embedded_messages::autoplay_stopped(was_running))
        .await?;

    Ok(())
}
