pub(crate) mod autoplay;
pub(crate) mod join;
pub(crate) mod move_track;
pub(crate) mod now_playing;
pub(crate) mod pause;
pub(crate) mod play;
pub(crate) mod queue;
pub(crate) mod remove;
pub(crate) mod skip;
pub(crate) mod stop;
pub(crate) mod volume;

pub mod audio_sources;
pub mod utils;

use crate::{CommandResult, Context, Error};
use poise::serenity_prelude as serenity;
use serenity::{ChannelId, GuildId};
use std::sync::Arc;
use utils::music_manager::{MusicError, MusicManager, MusicResult};
use utils::playback_state::ServerPlaybackState;
use utils::queue_manager::Requester;

/// The maximum character length allowed for a single Discord message.
const MAX_MESSAGE_LENGTH: usize = 2000;

fn guild_id(ctx: Context<'_>) -> Result<GuildId, Error> {
    ctx.guild_id()
        .ok_or_else(|| Box::new(MusicError::NotInGuild) as Error)
}

/// The playback state of the guild the command was used in
fn guild_state(ctx: Context<'_>) -> Result<Arc<ServerPlaybackState>, Error> {
    let guild_id = guild_id(ctx)?;
    Ok(ctx.data().coordinator.get_or_create(guild_id))
}

/// Connects to (or moves to) the author's voice channel
async fn summon_author(ctx: Context<'_>, state: &ServerPlaybackState) -> MusicResult<ChannelId> {
    let guild_id = state.guild_id();
    let channel_id =
        MusicManager::get_user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id)?;

    if state.is_connected().await {
        MusicManager::join_channel(ctx.serenity_context(), guild_id, channel_id).await?;
    } else {
        let transport = MusicManager::connect(
            ctx.serenity_context(),
            guild_id,
            channel_id,
            ctx.data().http_client.clone(),
        )
        .await?;
        state.attach_transport(transport).await;
    }

    Ok(channel_id)
}

/// The author, as the requester of a track
fn author_requester(ctx: Context<'_>) -> Requester {
    let author = ctx.author();
    Requester::member(author.id, author.display_name())
}

/// The bot itself, as the requester of autoplay picks
fn bot_requester(ctx: Context<'_>) -> Requester {
    let me = ctx.serenity_context().cache.current_user();
    Requester::autoplay(me.id, me.name.clone())
}

/// Names of the author's roles in this guild
async fn author_role_names(ctx: Context<'_>) -> Vec<String> {
    let Some(member) = ctx.author_member().await else {
        return Vec::new();
    };
    let role_ids = member.roles.clone();

    let Some(guild) = ctx.guild() else {
        return Vec::new();
    };
    role_ids
        .iter()
        .filter_map(|id| guild.roles.get(id).map(|role| role.name.clone()))
        .collect()
}

/// Sends a potentially long response string by splitting it into chunks
/// that respect Discord's message length limit.
async fn chunk_response<S: AsRef<str>>(ctx: Context<'_>, response: S) -> CommandResult {
    let response = response.as_ref();
    let mut iter = response.chars();
    let mut pos = 0;
    while pos < response.len() {
        let mut len = 0;
        for ch in iter.by_ref().take(MAX_MESSAGE_LENGTH) {
            len += ch.len_utf8();
        }
        ctx.say(&response[pos..pos + len]).await?;
        pos += len;
    }

    Ok(())
}
