use poise::serenity_prelude as serenity;
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::tracks::TrackHandle;
use songbird::{Call, Event, Songbird, TrackEvent};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::event_handlers::{CompletionNotifier, SongEndNotifier};
use crate::commands::music::audio_sources::{TrackMetadata, YoutubeResolver};

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Already in a voice channel")]
    AlreadyConnected,

    #[error("This is not a voice channel")]
    InvalidChannelType,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("You are not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("{kind}: {message}")]
    MediaResolution { kind: String, message: String },

    #[error("There is no song at position {position} (queue has {len})")]
    OutOfRange { position: usize, len: usize },

    #[error("Could not find a song matching {0:?}")]
    NoMatch(String),

    #[error("Can't determine which song to remove, {} match", .0.len())]
    AmbiguousMatch(Vec<String>),

    #[error("You have already voted to skip this song")]
    DuplicateVote,

    #[error("Not playing any music right now")]
    NothingPlaying,

    #[error("Volume must be between 0 and 100, got {0}")]
    InvalidVolume(i64),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Failed to update song history: {0}")]
    History(#[from] std::io::Error),
}

impl MusicError {
    /// Wraps a resolver failure, keeping the error's type name for the reply
    pub fn resolution<E: std::error::Error>(err: &E) -> Self {
        let kind = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error")
            .to_string();
        MusicError::MediaResolution {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// An active connection to one voice channel, playing at most one source at a time
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Starts `track`, replacing anything already playing. `on_complete` must be
    /// notified once the track ends for any reason, including [`stop`](Self::stop).
    async fn play(
        &self,
        track: &TrackMetadata,
        volume: f32,
        on_complete: CompletionNotifier,
    ) -> MusicResult<()>;

    async fn pause(&self) -> MusicResult<()>;

    async fn resume(&self) -> MusicResult<()>;

    async fn stop(&self) -> MusicResult<()>;

    /// Volume of the active source, 0.0 - 1.0
    async fn set_volume(&self, volume: f32) -> MusicResult<()>;

    async fn disconnect(&self) -> MusicResult<()>;
}

/// Manages Songbird instances and voice connections
pub struct MusicManager;

impl MusicManager {
    /// Get the Songbird voice client from the context
    pub async fn get_songbird(ctx: &Context) -> MusicResult<Arc<Songbird>> {
        songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
    }

    /// Join a voice channel, or move the existing call there
    pub async fn join_channel(
        ctx: &Context,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::get_songbird(ctx).await?;

        let handle = songbird.join(guild_id, channel_id).await.map_err(|e| {
            error!(
                "Failed to join voice channel {} for guild {}: {}",
                channel_id, guild_id, e
            );
            MusicError::JoinError(e.to_string())
        })?;

        info!("Joined voice channel {} in guild {}", channel_id, guild_id);
        Ok(handle)
    }

    /// Join `channel_id` and wrap the call in a transport
    pub async fn connect(
        ctx: &Context,
        guild_id: GuildId,
        channel_id: ChannelId,
        http: reqwest::Client,
    ) -> MusicResult<Arc<SongbirdTransport>> {
        let songbird = Self::get_songbird(ctx).await?;
        let call = Self::join_channel(ctx, guild_id, channel_id).await?;
        Ok(Arc::new(SongbirdTransport::new(guild_id, songbird, call, http)))
    }

    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        ctx: &Context,
        guild_id: GuildId,
        user_id: serenity::UserId,
    ) -> MusicResult<ChannelId> {
        // Get the guild
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        // Get the voice state of the user
        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }
}

/// [`VoiceTransport`] backed by a songbird call
pub struct SongbirdTransport {
    guild_id: GuildId,
    songbird: Arc<Songbird>,
    call: Arc<SerenityMutex<Call>>,
    http: reqwest::Client,
    current: Mutex<Option<TrackHandle>>,
}

impl SongbirdTransport {
    pub fn new(
        guild_id: GuildId,
        songbird: Arc<Songbird>,
        call: Arc<SerenityMutex<Call>>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            guild_id,
            songbird,
            call,
            http,
            current: Mutex::new(None),
        }
    }

    async fn current_track(&self) -> MusicResult<TrackHandle> {
        self.current
            .lock()
            .await
            .clone()
            .ok_or(MusicError::NothingPlaying)
    }
}

fn control_error(e: impl std::fmt::Display) -> MusicError {
    MusicError::Playback(e.to_string())
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn play(
        &self,
        track: &TrackMetadata,
        volume: f32,
        on_complete: CompletionNotifier,
    ) -> MusicResult<()> {
        let query = track.url.clone().unwrap_or_else(|| track.title.clone());
        let input = YoutubeResolver::input_for(self.http.clone(), &query);

        let handle = {
            let mut call = self.call.lock().await;
            call.play_only_input(input)
        };
        debug!("Track handle created for: {}", track.title);

        handle.set_volume(volume).map_err(control_error)?;

        // Either event ends the track; the player task ignores the second one.
        for event in [TrackEvent::End, TrackEvent::Error] {
            handle
                .add_event(
                    Event::Track(event),
                    SongEndNotifier {
                        guild_id: self.guild_id,
                        notifier: on_complete.clone(),
                    },
                )
                .map_err(control_error)?;
        }

        *self.current.lock().await = Some(handle);
        Ok(())
    }

    async fn pause(&self) -> MusicResult<()> {
        self.current_track().await?.pause().map_err(control_error)
    }

    async fn resume(&self) -> MusicResult<()> {
        self.current_track().await?.play().map_err(control_error)
    }

    async fn stop(&self) -> MusicResult<()> {
        match self.current.lock().await.take() {
            Some(track) => track.stop().map_err(control_error),
            None => Ok(()),
        }
    }

    async fn set_volume(&self, volume: f32) -> MusicResult<()> {
        self.current_track()
            .await?
            .set_volume(volume)
            .map_err(control_error)
    }

    async fn disconnect(&self) -> MusicResult<()> {
        self.songbird
            .remove(self.guild_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))
    }
}
