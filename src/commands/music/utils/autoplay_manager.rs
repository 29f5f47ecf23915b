use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::embedded_messages;
use super::history::SongHistory;
use super::playback_state::{Announcer, ServerPlaybackState};
use super::queue_manager::Requester;
use crate::commands::music::audio_sources::MediaResolver;

/// When autoplay tops up the queue, and how long it waits otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplaySettings {
    /// Top up while fewer than this many tracks are pending
    pub min_queue: usize,
    /// Distinct history entries needed before autoplay picks anything
    pub min_history: usize,
    pub interval: Duration,
}

impl Default for AutoplaySettings {
    fn default() -> Self {
        Self {
            min_queue: 3,
            min_history: 2,
            interval: Duration::from_secs(5),
        }
    }
}

/// Everything one guild's autoplay task needs
pub struct AutoplayJob {
    pub state: Arc<ServerPlaybackState>,
    pub resolver: Arc<dyn MediaResolver>,
    pub history: Arc<SongHistory>,
    pub announcer: Arc<dyn Announcer>,
    /// The bot's own identity; entries are tagged as autoplay picks
    pub bot: Requester,
    /// Where picks are announced
    pub channel_id: ChannelId,
}

/// Owns the autoplay task of each guild
pub struct AutoplayManager {
    tasks: DashMap<GuildId, JoinHandle<()>>,
    settings: AutoplaySettings,
}

impl AutoplayManager {
    pub fn new(settings: AutoplaySettings) -> Self {
        Self {
            tasks: DashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &AutoplaySettings {
        &self.settings
    }

    /// Starts autoplay for the job's guild, replacing a task that is already running
    pub async fn start(&self, job: AutoplayJob) {
        let guild_id = job.state.guild_id();
        self.stop(guild_id).await;

        let task = tokio::spawn(run_autoplay(job, self.settings.clone()));
        self.tasks.insert(guild_id, task);
        info!("Autoplay started for guild {}", guild_id);
    }

    /// Cancels the guild's autoplay task and waits for it. Returns whether one was
    /// running.
    pub async fn stop(&self, guild_id: GuildId) -> bool {
        let Some((_, task)) = self.tasks.remove(&guild_id) else {
            return false;
        };

        let was_running = !task.is_finished();
        task.abort();
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                warn!("Autoplay task for guild {} failed: {}", guild_id, e);
            }
        }
        info!("Autoplay stopped for guild {}", guild_id);
        was_running
    }

    pub fn is_running(&self, guild_id: GuildId) -> bool {
        self.tasks
            .get(&guild_id)
            .is_some_and(|task| !task.is_finished())
    }
}

/// Keeps the guild's queue topped up from the song history until cancelled or
/// until the guild loses its voice connection.
pub async fn run_autoplay(job: AutoplayJob, settings: AutoplaySettings) {
    let guild_id = job.state.guild_id();

    loop {
        if !job.state.is_connected().await {
            info!("Guild {} is no longer connected, ending autoplay", guild_id);
            break;
        }

        let low_queue = job.state.pending_len().await < settings.min_queue;
        let pick = if low_queue && job.history.distinct().await.len() >= settings.min_history {
            job.history.pick_random().await
        } else {
            None
        };

        let Some(query) = pick else {
            debug!("Autoplay idle for guild {}", guild_id);
            tokio::time::sleep(settings.interval).await;
            continue;
        };

        job.announcer
            .announce(job.channel_id, embedded_messages::queueing_new_song_text())
            .await;

        match job
            .state
            .enqueue_query(job.resolver.as_ref(), &query, job.bot.clone(), job.channel_id)
            .await
        {
            Ok((entry, _)) => {
                job.announcer
                    .announce(job.channel_id, embedded_messages::enqueued_text(&entry))
                    .await;
            }
            Err(e) => {
                warn!("Autoplay failed to queue '{}' for guild {}: {}", query, guild_id, e);
                job.announcer
                    .announce(job.channel_id, embedded_messages::error_text(&e))
                    .await;
                tokio::time::sleep(settings.interval).await;
            }
        }
    }
}
