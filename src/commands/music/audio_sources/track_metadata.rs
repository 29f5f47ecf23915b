//! Defines the `TrackMetadata` struct, the resolved description of a playable track.

use serde::{Deserialize, Serialize};
use songbird::input::AuxMetadata;
use std::time::Duration;

/// Resolved information about a track, as reported by the media resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The channel or artist that uploaded the track.
    pub uploader: String,
    /// The direct URL to the track, if the resolver reported one.
    pub url: Option<String>,
    /// The duration of the track, if available.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Track".to_string(),
            uploader: "Unknown Uploader".to_string(),
            url: None,
            duration: None,
            thumbnail: None,
        }
    }
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>, uploader: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uploader: uploader.into(),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// yt-dlp reports the uploading channel as `channel`; music uploads sometimes only
/// carry an `artist`.
impl From<AuxMetadata> for TrackMetadata {
    fn from(aux: AuxMetadata) -> Self {
        let defaults = TrackMetadata::default();
        Self {
            title: aux.title.or(aux.track).unwrap_or(defaults.title),
            uploader: aux.channel.or(aux.artist).unwrap_or(defaults.uploader),
            url: aux.source_url,
            duration: aux.duration,
            thumbnail: aux.thumbnail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aux_metadata_prefers_title_and_channel() {
        let aux = AuxMetadata {
            title: Some("Never Gonna Give You Up".into()),
            track: Some("Never Gonna Give You Up (Remastered)".into()),
            channel: Some("Rick Astley".into()),
            artist: Some("Rick Astley & co".into()),
            source_url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".into()),
            duration: Some(Duration::from_secs(213)),
            ..Default::default()
        };

        let metadata = TrackMetadata::from(aux);

        assert_eq!(metadata.title, "Never Gonna Give You Up");
        assert_eq!(metadata.uploader, "Rick Astley");
        assert_eq!(metadata.duration, Some(Duration::from_secs(213)));
        assert_eq!(
            metadata.url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn aux_metadata_falls_back_to_defaults() {
        let metadata = TrackMetadata::from(AuxMetadata::default());
        assert_eq!(metadata, TrackMetadata::default());
    }
}
