//! The `stop` path: autoplay, player task and voice connection all go away

mod common;

use common::fixtures::*;
use common::mocks::{FakeResolver, FakeTransport, RecordingAnnouncer};
use common::{init, wait_for};
use dakbot::commands::music::utils::autoplay_manager::{AutoplayJob, AutoplayManager};
use dakbot::commands::music::utils::coordinator::PlaybackCoordinator;
use dakbot::commands::music::utils::history::SongHistory;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn stop_guild_cancels_autoplay_and_disconnects() {
    init();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("songs.txt");
    tokio::fs::write(&path, "old song 1\nold song 2\n").await.unwrap();
    let history = Arc::new(SongHistory::load(path).await.unwrap());

    let (announcer, _announcements) = RecordingAnnouncer::new();
    let announcer = Arc::new(announcer);
    let coordinator = PlaybackCoordinator::new(playback_settings(), announcer.clone());
    let autoplay = AutoplayManager::new(fast_autoplay());

    let state = coordinator.get_or_create(guild());
    let (transport, mut started) = FakeTransport::new();
    let transport = Arc::new(transport);
    state.attach_transport(transport.clone()).await;

    autoplay
        .start(AutoplayJob {
            state: state.clone(),
            resolver: Arc::new(FakeResolver),
            history,
            announcer,
            bot: bot(),
            channel_id: text_channel(),
        })
        .await;
    wait_for(&mut started, |title| title.starts_with("old song ")).await;

    assert!(coordinator.stop_guild(&autoplay, guild()).await);

    assert!(!autoplay.is_running(guild()));
    assert!(transport.is_disconnected());
    assert!(coordinator.get(guild()).is_none());
    assert!(state.current().await.is_none());
    assert_eq!(state.pending_len().await, 0);

    // The old player task is gone, so nothing queued on the stale state plays
    state
        .enqueue_query(&FakeResolver, "late song", alice(), text_channel())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    while let Ok(title) = started.try_recv() {
        assert!(title.starts_with("old song "), "{} started after stop", title);
    }
    assert_eq!(state.pending_len().await, 1);

    assert!(!coordinator.stop_guild(&autoplay, guild()).await);
}
