//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across the integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use dakbot::commands::music::utils::playback_state::ServerPlaybackState;
use dakbot::commands::music::utils::queue_manager::Requester;
use mocks::{FakeResolver, FakeTransport, RecordingAnnouncer};
use std::future::Future;
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Level;

static INIT: Once = Once::new();

/// How long a test waits for the player task before giving up
pub const WAIT: Duration = Duration::from_secs(2);

/// Initialize test environment
pub fn init() {
    INIT.call_once(|| {
        // Initialize tracing for tests
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// Receives from `rx` until `predicate` matches, panicking after [`WAIT`]
pub async fn wait_for<F>(rx: &mut mpsc::UnboundedReceiver<String>, predicate: F) -> String
where
    F: Fn(&str) -> bool,
{
    let found = tokio::time::timeout(WAIT, async {
        while let Some(message) = rx.recv().await {
            if predicate(&message) {
                return Some(message);
            }
        }
        None
    })
    .await;

    match found {
        Ok(Some(message)) => message,
        Ok(None) => panic!("channel closed while waiting"),
        Err(_) => panic!("timed out waiting for a matching message"),
    }
}

/// Polls `condition` until it holds, panicking after [`WAIT`]
pub async fn eventually<F, Fut>(condition: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let reached = tokio::time::timeout(WAIT, async {
        while !condition().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    assert!(reached.is_ok(), "condition not reached in time");
}

/// A guild whose player is connected to a [`FakeTransport`]
pub struct Harness {
    pub state: Arc<ServerPlaybackState>,
    pub transport: Arc<FakeTransport>,
    pub announcer: Arc<RecordingAnnouncer>,
    /// Titles of tracks as the transport starts them
    pub started: mpsc::UnboundedReceiver<String>,
    /// Everything announced to chat
    pub announcements: mpsc::UnboundedReceiver<String>,
}

impl Harness {
    pub async fn connected() -> Self {
        Self::connect(Self::disconnected()).await
    }

    /// Connected, with announcements that take `delay` to go out
    pub async fn connected_with_slow_chat(delay: Duration) -> Self {
        Self::connect(Self::with_announcer(RecordingAnnouncer::with_delay(delay))).await
    }

    async fn connect(mut harness: Self) -> Self {
        let (transport, started) = FakeTransport::new();
        let transport = Arc::new(transport);
        harness.state.attach_transport(transport.clone()).await;
        harness.transport = transport;
        harness.started = started;
        harness
    }

    /// The transport is created but never attached
    pub fn disconnected() -> Self {
        Self::with_announcer(RecordingAnnouncer::new())
    }

    fn with_announcer(
        (announcer, announcements): (RecordingAnnouncer, mpsc::UnboundedReceiver<String>),
    ) -> Self {
        init();
        let announcer = Arc::new(announcer);
        let (transport, started) = FakeTransport::new();
        let state = Arc::new(ServerPlaybackState::new(
            fixtures::guild(),
            &fixtures::playback_settings(),
            announcer.clone(),
        ));

        Self {
            state,
            transport: Arc::new(transport),
            announcer,
            started,
            announcements,
        }
    }

    /// Resolves and enqueues `query` on behalf of `requester`
    pub async fn play(&self, query: &str, requester: Requester) {
        self.state
            .enqueue_query(&FakeResolver, query, requester, fixtures::text_channel())
            .await
            .expect("query should resolve");
    }

    /// Waits until the transport starts `title`
    pub async fn started(&mut self, title: &str) {
        wait_for(&mut self.started, |started| started == title).await;
    }
}
