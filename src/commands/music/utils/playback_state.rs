//! Per-guild playback state and the player task that drains its queue.
//!
//! The player task is the only writer of the current entry. Commands mutate the
//! pending queue and skip votes under the same per-guild lock, and transports
//! report track completion through [`CompletionNotifier`], which posts an event to
//! the task instead of touching the state. Passing skips are posted to the same
//! task, which stops the track itself.

use poise::serenity_prelude as serenity;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::event_handlers::{CompletionNotifier, PlaybackEvent};
use super::music_manager::{MusicError, MusicResult, VoiceTransport};
use super::queue_manager::{QueueEntry, Requester, TrackQueue};
use super::skip_vote::{self, SkipOutcome, SkipPolicy, Voter};
use crate::commands::music::audio_sources::MediaResolver;

/// Posts plain-text messages to a guild text channel
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, channel_id: ChannelId, message: String);
}

/// [`Announcer`] that sends through the Discord HTTP API
pub struct HttpAnnouncer {
    http: Arc<serenity::Http>,
}

impl HttpAnnouncer {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Announcer for HttpAnnouncer {
    async fn announce(&self, channel_id: ChannelId, message: String) {
        if let Err(e) = channel_id.say(self.http.clone(), message).await {
            warn!("Failed to send message to channel {}: {}", channel_id, e);
        }
    }
}

/// Settings shared by every guild's player
#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    pub skip_policy: SkipPolicy,
    /// Volume for new tracks until someone changes it, 0.0 - 1.0
    pub default_volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            skip_policy: SkipPolicy::default(),
            default_volume: 0.6,
        }
    }
}

struct PlayerState {
    current: Option<QueueEntry>,
    transport: Option<Arc<dyn VoiceTransport>>,
    queue: TrackQueue,
    skip_votes: HashSet<UserId>,
    volume: f32,
    /// Incremented for every track handed to the transport
    sequence: u64,
}

struct Shared {
    guild_id: GuildId,
    state: Mutex<PlayerState>,
    queue_ready: Notify,
    /// Feeds the player task; shared by completion notifiers and skip requests
    events: mpsc::UnboundedSender<PlaybackEvent>,
    announcer: Arc<dyn Announcer>,
    skip_policy: SkipPolicy,
}

impl Shared {
    /// Waits until the queue has an entry and takes it
    async fn next_entry(&self) -> QueueEntry {
        loop {
            let next = self.state.lock().await.queue.pop_front();
            if let Some(entry) = next {
                return entry;
            }
            self.queue_ready.notified().await;
        }
    }
}

/// Playback state of one guild
pub struct ServerPlaybackState {
    shared: Arc<Shared>,
    player_task: Mutex<Option<JoinHandle<()>>>,
}

impl ServerPlaybackState {
    /// Creates the state and spawns its player task. Must be called inside a
    /// tokio runtime.
    pub fn new(
        guild_id: GuildId,
        settings: &PlaybackSettings,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            guild_id,
            state: Mutex::new(PlayerState {
                current: None,
                transport: None,
                queue: TrackQueue::new(),
                skip_votes: HashSet::new(),
                volume: settings.default_volume,
                sequence: 0,
            }),
            queue_ready: Notify::new(),
            events: events_tx,
            announcer,
            skip_policy: settings.skip_policy.clone(),
        });

        let task = tokio::spawn(player_loop(Arc::clone(&shared), events_rx));
        info!("Started player task for guild {}", guild_id);

        Self {
            shared,
            player_task: Mutex::new(Some(task)),
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.shared.guild_id
    }

    pub async fn attach_transport(&self, transport: Arc<dyn VoiceTransport>) {
        self.shared.state.lock().await.transport = Some(transport);
    }

    pub async fn is_connected(&self) -> bool {
        self.shared.state.lock().await.transport.is_some()
    }

    pub async fn current(&self) -> Option<QueueEntry> {
        self.shared.state.lock().await.current.clone()
    }

    pub async fn skip_vote_count(&self) -> usize {
        self.shared.state.lock().await.skip_votes.len()
    }

    pub fn skip_threshold(&self) -> usize {
        self.shared.skip_policy.threshold
    }

    pub async fn volume(&self) -> f32 {
        self.shared.state.lock().await.volume
    }

    /// Appends to the pending queue and wakes the player task. Returns the
    /// entry's 1-based position.
    pub async fn enqueue(&self, entry: QueueEntry) -> usize {
        let position = {
            let mut state = self.shared.state.lock().await;
            state.queue.push_back(entry);
            state.queue.len()
        };
        self.shared.queue_ready.notify_one();
        position
    }

    /// Resolves `query` and enqueues the result. Nothing is queued when
    /// resolution fails.
    pub async fn enqueue_query(
        &self,
        resolver: &dyn MediaResolver,
        query: &str,
        requester: Requester,
        channel_id: ChannelId,
    ) -> MusicResult<(QueueEntry, usize)> {
        let metadata = resolver.resolve(query).await?;
        let entry = QueueEntry::new(requester, channel_id, metadata);
        let position = self.enqueue(entry.clone()).await;
        info!(
            "Enqueued '{}' at position {} for guild {}",
            entry.metadata().title,
            position,
            self.guild_id()
        );
        Ok((entry, position))
    }

    pub async fn pending_len(&self) -> usize {
        self.shared.state.lock().await.queue.len()
    }

    /// Descriptions of the pending entries, head first
    pub async fn pending_descriptions(&self) -> Vec<String> {
        self.shared.state.lock().await.queue.descriptions()
    }

    pub async fn remove_at(&self, position: usize) -> MusicResult<QueueEntry> {
        self.shared.state.lock().await.queue.remove_at(position)
    }

    pub async fn remove_matching(&self, query: &str) -> MusicResult<QueueEntry> {
        self.shared.state.lock().await.queue.remove_matching(query)
    }

    pub async fn move_entry(&self, from: usize, to: usize) -> MusicResult<()> {
        self.shared.state.lock().await.queue.move_entry(from, to)
    }

    /// Applies the skip rules for `voter`. A passing request clears the votes and
    /// asks the player task to stop the current track, even if its playback
    /// hasn't started yet.
    pub async fn vote_skip(&self, voter: &Voter) -> MusicResult<SkipOutcome> {
        let outcome = {
            let mut state = self.shared.state.lock().await;
            let state = &mut *state;
            let Some(current) = state.current.as_ref() else {
                return Err(MusicError::NothingPlaying);
            };
            if state.transport.is_none() {
                return Err(MusicError::NothingPlaying);
            }

            let outcome =
                skip_vote::evaluate(&self.shared.skip_policy, current, &mut state.skip_votes, voter)?;
            if outcome.skips() {
                state.skip_votes.clear();
                let event = PlaybackEvent::Skip {
                    sequence: state.sequence,
                };
                if self.shared.events.send(event).is_err() {
                    return Err(MusicError::NothingPlaying);
                }
            }
            outcome
        };

        debug!("Skip request in guild {}: {:?}", self.guild_id(), outcome);
        Ok(outcome)
    }

    async fn playing_transport(&self) -> MusicResult<Arc<dyn VoiceTransport>> {
        let state = self.shared.state.lock().await;
        match (&state.current, &state.transport) {
            (Some(_), Some(transport)) => Ok(Arc::clone(transport)),
            _ => Err(MusicError::NothingPlaying),
        }
    }

    pub async fn pause(&self) -> MusicResult<()> {
        self.playing_transport().await?.pause().await
    }

    pub async fn resume(&self) -> MusicResult<()> {
        self.playing_transport().await?.resume().await
    }

    /// Sets the volume of the current track (and of later ones) from a 0-100
    /// percentage. Returns the applied 0.0 - 1.0 volume.
    pub async fn set_volume(&self, percent: i64) -> MusicResult<f32> {
        if !(0..=100).contains(&percent) {
            return Err(MusicError::InvalidVolume(percent));
        }
        let transport = self.playing_transport().await?;
        let volume = percent as f32 / 100.0;
        transport.set_volume(volume).await?;
        self.shared.state.lock().await.volume = volume;
        Ok(volume)
    }

    /// Stops the current track, cancels the player task (waiting for it to
    /// finish) and disconnects. Errors along the way are logged and ignored.
    pub async fn shutdown(&self) {
        let guild_id = self.guild_id();
        let transport = {
            let mut state = self.shared.state.lock().await;
            state.queue.clear();
            state.skip_votes.clear();
            state.transport.take()
        };

        if let Some(transport) = &transport {
            if let Err(e) = transport.stop().await {
                warn!("Failed to stop playback in guild {}: {}", guild_id, e);
            }
        }

        if let Some(task) = self.player_task.lock().await.take() {
            task.abort();
            match task.await {
                Err(e) if !e.is_cancelled() => {
                    warn!("Player task for guild {} failed: {}", guild_id, e)
                }
                _ => info!("Player task for guild {} stopped", guild_id),
            }
        }

        self.shared.state.lock().await.current = None;

        if let Some(transport) = transport {
            if let Err(e) = transport.disconnect().await {
                warn!("Failed to disconnect in guild {}: {}", guild_id, e);
            }
        }
    }
}

async fn player_loop(shared: Arc<Shared>, mut events: mpsc::UnboundedReceiver<PlaybackEvent>) {
    let guild_id = shared.guild_id;
    loop {
        let entry = shared.next_entry().await;

        let (transport, volume, sequence) = {
            let mut state = shared.state.lock().await;
            state.sequence += 1;
            state.current = Some(entry.clone());
            state.skip_votes.clear();
            (state.transport.clone(), state.volume, state.sequence)
        };

        info!(
            "Now playing '{}' in guild {}",
            entry.metadata().title,
            guild_id
        );
        shared
            .announcer
            .announce(entry.channel_id(), format!("Now playing {}", entry))
            .await;

        let started = match &transport {
            Some(transport) => {
                let notifier = CompletionNotifier::new(sequence, shared.events.clone());
                transport
                    .play(entry.metadata(), volume, notifier)
                    .await
                    .map(|()| Arc::clone(transport))
            }
            None => Err(MusicError::NotConnected),
        };

        match started {
            Ok(transport) => {
                wait_for_end(&mut events, sequence, transport.as_ref(), guild_id).await
            }
            Err(e) => {
                error!(
                    "Failed to start '{}' in guild {}: {}",
                    entry.metadata().title,
                    guild_id,
                    e
                );
                shared
                    .announcer
                    .announce(
                        entry.channel_id(),
                        format!("Could not play *{}*: {}", entry.metadata().title, e),
                    )
                    .await;
            }
        }

        shared.state.lock().await.current = None;
    }
}

/// Waits for the end of track `sequence`, discarding events left over from
/// earlier tracks. A skip for this track stops it and ends the wait without
/// waiting for the transport to confirm.
async fn wait_for_end(
    events: &mut mpsc::UnboundedReceiver<PlaybackEvent>,
    sequence: u64,
    transport: &dyn VoiceTransport,
    guild_id: GuildId,
) {
    while let Some(event) = events.recv().await {
        match event {
            PlaybackEvent::TrackEnded { sequence: ended } if ended == sequence => return,
            PlaybackEvent::Skip { sequence: skipped } if skipped == sequence => {
                if let Err(e) = transport.stop().await {
                    warn!("Failed to stop skipped track in guild {}: {}", guild_id, e);
                }
                return;
            }
            stale => debug!("Ignoring stale {:?}", stale),
        }
    }
}
