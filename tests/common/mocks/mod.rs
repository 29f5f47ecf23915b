//! Fake voice, resolver and chat implementations used in place of Discord

use async_trait::async_trait;
use dakbot::commands::music::audio_sources::{AudioSourceResult, MediaResolver, TrackMetadata};
use dakbot::commands::music::utils::event_handlers::CompletionNotifier;
use dakbot::commands::music::utils::music_manager::{MusicError, MusicResult, VoiceTransport};
use dakbot::commands::music::utils::playback_state::Announcer;
use mockall::mock;
use serenity::model::id::ChannelId;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

mock! {
    pub Resolver {}

    #[async_trait]
    impl MediaResolver for Resolver {
        async fn resolve(&self, query: &str) -> AudioSourceResult<TrackMetadata>;
    }
}

/// Resolves every query to a track titled after it. Queries containing
/// "broken" fail the way an unavailable video does.
pub struct FakeResolver;

#[async_trait]
impl MediaResolver for FakeResolver {
    async fn resolve(&self, query: &str) -> AudioSourceResult<TrackMetadata> {
        if query.contains("broken") {
            return Err(MusicError::MediaResolution {
                kind: "DownloadError".to_string(),
                message: format!("Video unavailable: {}", query),
            });
        }

        Ok(TrackMetadata::new(query, "Uploader")
            .with_duration(Duration::from_secs(180))
            .with_url(format!("https://www.youtube.com/watch?v={}", query.replace(' ', "_"))))
    }
}

/// Records announcements and forwards them to the test
pub struct RecordingAnnouncer {
    messages: mpsc::UnboundedSender<String>,
    log: Mutex<Vec<(ChannelId, String)>>,
    /// Added to every announcement, like a slow Discord API
    delay: Duration,
}

impl RecordingAnnouncer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let announcer = Self {
            messages: tx,
            log: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        };
        (announcer, rx)
    }

    pub fn with_delay(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (announcer, rx) = Self::new();
        (Self { delay, ..announcer }, rx)
    }

    pub fn log(&self) -> Vec<(ChannelId, String)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, channel_id: ChannelId, message: String) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.lock().unwrap().push((channel_id, message.clone()));
        let _ = self.messages.send(message);
    }
}

/// In-memory voice connection. Ending a track notifies from a separate OS
/// thread, like songbird's driver does.
pub struct FakeTransport {
    started: mpsc::UnboundedSender<String>,
    current: Mutex<Option<CompletionNotifier>>,
    volumes: Mutex<Vec<f32>>,
    paused: AtomicBool,
    disconnected: AtomicBool,
}

impl FakeTransport {
    /// The receiver yields the title of every track that starts
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            started: tx,
            current: Mutex::new(None),
            volumes: Mutex::new(Vec::new()),
            paused: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
        };
        (transport, rx)
    }

    /// Plays the current track to its natural end
    pub fn finish_current(&self) {
        self.end_current();
    }

    pub fn volumes(&self) -> Vec<f32> {
        self.volumes.lock().unwrap().clone()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    fn end_current(&self) {
        if let Some(notifier) = self.current.lock().unwrap().take() {
            std::thread::spawn(move || notifier.notify())
                .join()
                .unwrap();
        }
    }
}

#[async_trait]
impl VoiceTransport for FakeTransport {
    async fn play(
        &self,
        track: &TrackMetadata,
        volume: f32,
        on_complete: CompletionNotifier,
    ) -> MusicResult<()> {
        if track.title.contains("unplayable") {
            return Err(MusicError::Playback("unsupported codec".to_string()));
        }

        *self.current.lock().unwrap() = Some(on_complete);
        self.volumes.lock().unwrap().push(volume);
        self.paused.store(false, Ordering::SeqCst);
        let _ = self.started.send(track.title.clone());
        Ok(())
    }

    async fn pause(&self) -> MusicResult<()> {
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> MusicResult<()> {
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> MusicResult<()> {
        self.end_current();
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> MusicResult<()> {
        self.volumes.lock().unwrap().push(volume);
        Ok(())
    }

    async fn disconnect(&self) -> MusicResult<()> {
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }
}
