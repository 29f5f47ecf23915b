use poise::serenity_prelude as serenity;
use serenity::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Events posted to a guild's player task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The track started with the given sequence number has finished, been
    /// stopped, or failed mid-stream.
    TrackEnded { sequence: u64 },
    /// A skip passed while the track with this sequence number was current.
    /// It may arrive before that track has started playing.
    Skip { sequence: u64 },
}

/// Handed to a [`VoiceTransport`](super::music_manager::VoiceTransport) when a track
/// starts. Calling [`notify`](Self::notify) never touches playback state; it only
/// posts an event to the player task, so it is safe from any thread.
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    sequence: u64,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl CompletionNotifier {
    pub fn new(sequence: u64, events: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self { sequence, events }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn notify(&self) {
        let event = PlaybackEvent::TrackEnded {
            sequence: self.sequence,
        };
        if self.events.send(event).is_err() {
            debug!(
                "Player task is gone, dropping end of track {}",
                self.sequence
            );
        }
    }
}

/// Event handler for when a song ends
pub struct SongEndNotifier {
    pub guild_id: serenity::GuildId,
    pub notifier: CompletionNotifier,
}

#[async_trait]
impl songbird::EventHandler for SongEndNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(_) = ctx {
            info!(
                "Track {} ended for guild {}",
                self.notifier.sequence(),
                self.guild_id
            );
            self.notifier.notify();
        }
        None
    }
}
