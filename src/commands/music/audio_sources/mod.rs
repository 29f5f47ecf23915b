//! This module defines the interface for resolving user queries into playable tracks.
//! The YouTube implementation drives `yt-dlp` through songbird.

/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub(crate) mod track_metadata;
/// Submodule implementing the `MediaResolver` trait for YouTube.
pub(crate) mod youtube;

use crate::commands::music::utils::music_manager::MusicError;
use serenity::async_trait;
use url::Url;

pub use track_metadata::TrackMetadata;
pub use youtube::YoutubeResolver;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// Turns a search string or URL into a playable track description.
/// Requires `Send + Sync` to be shared between commands and autoplay tasks.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolves `query` into metadata whose `url` can later be handed to a
    /// [`VoiceTransport`](crate::commands::music::utils::music_manager::VoiceTransport).
    ///
    /// Failures are reported as [`MusicError::MediaResolution`].
    async fn resolve(&self, query: &str) -> AudioSourceResult<TrackMetadata>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as a URL.
    /// Does not validate if the URL is actually reachable or supported by any specific API.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}
