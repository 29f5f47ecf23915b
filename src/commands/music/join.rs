use super::*;
use crate::commands::music::utils::embedded_messages;
use poise::serenity_prelude::{ChannelType, GuildChannel, Mentionable};

/// Joins a voice channel.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn join(
    ctx: Context<'_>,
    #[description = "Voice channel to join"] channel: GuildChannel,
) -> CommandResult {
    let state = guild_state(ctx)?;

    if !matches!(channel.kind, ChannelType::Voice | ChannelType::Stage) {
        ctx.send(embedded_messages::error(&MusicError::InvalidChannelType))
            .await?;
        return Ok(());
    }

    if state.is_connected().await {
        ctx.send(embedded_messages::error(&MusicError::AlreadyConnected))
            .await?;
        return Ok(());
    }

    ctx.defer().await?;

    let connected = MusicManager::connect(
        ctx.serenity_context(),
        state.guild_id(),
        channel.id,
        ctx.data().http_client.clone(),
    )
    .await;

    match connected {
        Ok(transport) => {
            state.attach_transport(transport).await;
            ctx.send(embedded_messages::ready_to_play(&channel.name))
                .await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
        }
    }

    Ok(())
}

/// Summons the bot to join your voice channel.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn summon(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;
    ctx.defer().await?;

    match summon_author(ctx, &state).await {
        Ok(channel_id) => {
            ctx.send(embedded_messages::summoned(&channel_id.mention().to_string()))
                .await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
        }
    }

    Ok(())
}
