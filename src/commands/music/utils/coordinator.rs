use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tracing::info;

use super::autoplay_manager::AutoplayManager;
use super::playback_state::{Announcer, PlaybackSettings, ServerPlaybackState};

/// Registry of per-guild playback states. States are created on first use and
/// only removed by [`teardown`](Self::teardown).
pub struct PlaybackCoordinator {
    states: DashMap<GuildId, Arc<ServerPlaybackState>>,
    settings: PlaybackSettings,
    announcer: Arc<dyn Announcer>,
}

impl PlaybackCoordinator {
    pub fn new(settings: PlaybackSettings, announcer: Arc<dyn Announcer>) -> Self {
        Self {
            states: DashMap::new(),
            settings,
            announcer,
        }
    }

    /// Get the state for this guild, starting its player task if it is new
    pub fn get_or_create(&self, guild_id: GuildId) -> Arc<ServerPlaybackState> {
        self.states
            .entry(guild_id)
            .or_insert_with(|| {
                info!("Creating playback state for guild {}", guild_id);
                Arc::new(ServerPlaybackState::new(
                    guild_id,
                    &self.settings,
                    Arc::clone(&self.announcer),
                ))
            })
            .value()
            .clone()
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<ServerPlaybackState>> {
        self.states.get(&guild_id).map(|state| state.value().clone())
    }

    /// Removes the guild's state and shuts it down. Returns whether there was one.
    pub async fn teardown(&self, guild_id: GuildId) -> bool {
        // Remove first so the map guard is released before awaiting the shutdown.
        let removed = self.states.remove(&guild_id);
        match removed {
            Some((_, state)) => {
                state.shutdown().await;
                info!("Tore down playback state for guild {}", guild_id);
                true
            }
            None => false,
        }
    }

    /// What the `stop` command does: cancel the guild's autoplay, then tear the
    /// guild down. Returns whether there was playback state to tear down.
    pub async fn stop_guild(&self, autoplay: &AutoplayManager, guild_id: GuildId) -> bool {
        autoplay.stop(guild_id).await;
        self.teardown(guild_id).await
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
