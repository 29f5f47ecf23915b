//! Implements the `MediaResolver` trait for YouTube.
//! Uses the `yt-dlp` command-line tool (through songbird's `YoutubeDl`) to extract information.

use serenity::async_trait;
use songbird::input::{Compose, Input, YoutubeDl};
use tracing::{debug, info};

use super::{AudioSource, AudioSourceResult, MediaResolver, TrackMetadata};
use crate::commands::music::utils::music_manager::MusicError;

/// Resolves URLs directly and anything else as a YouTube search, taking the
/// first result.
#[derive(Clone, Default)]
pub struct YoutubeResolver {
    http: reqwest::Client,
}

impl YoutubeResolver {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Builds a playable songbird input for a resolved URL (or, failing that, the
    /// original query).
    pub fn input_for(http: reqwest::Client, query: &str) -> Input {
        if AudioSource::is_url(query) {
            YoutubeDl::new(http, query.to_string()).into()
        } else {
            YoutubeDl::new_search(http, query.to_string()).into()
        }
    }
}

#[async_trait]
impl MediaResolver for YoutubeResolver {
    async fn resolve(&self, query: &str) -> AudioSourceResult<TrackMetadata> {
        info!("Resolving audio source for query: {}", query);

        // URLs are fetched as-is, anything else goes through `ytsearch`.
        let mut source = if AudioSource::is_url(query) {
            YoutubeDl::new(self.http.clone(), query.to_string())
        } else {
            YoutubeDl::new_search(self.http.clone(), query.to_string())
        };
        let aux = source
            .aux_metadata()
            .await
            .map_err(|e| MusicError::resolution(&e))?;

        let mut metadata = TrackMetadata::from(aux);
        // Searches don't always report the video they landed on; fall back to the
        // original query so the transport can repeat the lookup.
        if metadata.url.is_none() {
            metadata.url = Some(query.to_string());
        }

        debug!("Resolved '{}' to '{}'", query, metadata.title);
        Ok(metadata)
    }
}
