use super::format_duration;
use super::music_manager::{MusicError, MusicResult};
use crate::commands::music::audio_sources::TrackMetadata;
use serenity::model::id::{ChannelId, UserId};
use std::collections::VecDeque;
use std::fmt;

/// Where a queued track came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Requested by a guild member with `play`
    Member,
    /// Picked by the autoplay task on the bot's behalf
    Autoplay,
}

/// The user a track is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: UserId,
    pub name: String,
    pub origin: RequestOrigin,
}

impl Requester {
    pub fn member(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            origin: RequestOrigin::Member,
        }
    }

    /// The bot's own identity, used for autoplay picks
    pub fn autoplay(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            origin: RequestOrigin::Autoplay,
        }
    }

    pub fn is_autoplay(&self) -> bool {
        self.origin == RequestOrigin::Autoplay
    }
}

/// A queued (or playing) track together with who asked for it and where
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    requester: Requester,
    channel_id: ChannelId,
    metadata: TrackMetadata,
}

impl QueueEntry {
    pub fn new(requester: Requester, channel_id: ChannelId, metadata: TrackMetadata) -> Self {
        Self {
            requester,
            channel_id,
            metadata,
        }
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    /// The text channel the request was made from; announcements go here.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    /// The human-readable description used in replies and for text matching
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "*{}* by {}, requested by {}",
            self.metadata.title, self.metadata.uploader, self.requester.name
        )?;
        if let Some(duration) = self.metadata.duration {
            write!(f, " [{}]", format_duration(duration))?;
        }
        Ok(())
    }
}

/// The pending (not yet playing) tracks of one guild, in insertion order.
///
/// Every positional operation takes 1-based positions, as typed by users.
#[derive(Debug, Default)]
pub struct TrackQueue {
    entries: VecDeque<QueueEntry>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, entry: QueueEntry) {
        self.entries.push_back(entry);
    }

    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.entries.iter().map(QueueEntry::description).collect()
    }

    fn index_of(&self, position: usize) -> MusicResult<usize> {
        if position == 0 || position > self.entries.len() {
            return Err(MusicError::OutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(position - 1)
    }

    /// Removes the entry at a 1-based position
    pub fn remove_at(&mut self, position: usize) -> MusicResult<QueueEntry> {
        let index = self.index_of(position)?;
        self.entries
            .remove(index)
            .ok_or(MusicError::OutOfRange {
                position,
                len: self.entries.len(),
            })
    }

    /// Removes the single entry whose description contains every word of `query`,
    /// ignoring case. Nothing is removed when zero or several entries match.
    pub fn remove_matching(&mut self, query: &str) -> MusicResult<QueueEntry> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Err(MusicError::NoMatch(query.to_string()));
        }

        let matches: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                let description = entry.description().to_lowercase();
                words.iter().all(|word| description.contains(word.as_str()))
            })
            .map(|(index, _)| index)
            .collect();

        match matches.as_slice() {
            [] => Err(MusicError::NoMatch(query.to_string())),
            [index] => self
                .entries
                .remove(*index)
                .ok_or_else(|| MusicError::NoMatch(query.to_string())),
            several => Err(MusicError::AmbiguousMatch(
                several
                    .iter()
                    .map(|&index| self.entries[index].description())
                    .collect(),
            )),
        }
    }

    /// Moves the entry at `from` so that it ends up at `to`; everything else keeps
    /// its relative order.
    pub fn move_entry(&mut self, from: usize, to: usize) -> MusicResult<()> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;

        if let Some(entry) = self.entries.remove(from_index) {
            self.entries.insert(to_index, entry);
        }
        Ok(())
    }
}
