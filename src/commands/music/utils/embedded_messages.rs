//! Replies and announcements for the music commands.

use poise::CreateReply;
use poise::serenity_prelude::CreateEmbed;

use super::music_manager::MusicError;
use super::queue_manager::QueueEntry;
use super::skip_vote::SkipOutcome;

fn text(content: impl Into<String>) -> CreateReply {
    CreateReply::default().content(content).ephemeral(false)
}

/// Chat text for a failed command
pub fn error_text(err: &MusicError) -> String {
    match err {
        MusicError::MediaResolution { kind, message } => format!(
            "An error occurred while processing this request: ```\n{}: {}\n```",
            kind, message
        ),
        MusicError::AlreadyConnected => "Already in a voice channel...".to_string(),
        MusicError::InvalidChannelType => "This is not a voice channel...".to_string(),
        MusicError::UserNotInVoiceChannel => "You are not in a voice channel.".to_string(),
        MusicError::OutOfRange { .. } => {
            "There is no song corresponding to this number".to_string()
        }
        MusicError::NoMatch(_) => "Could not find song matching that pattern".to_string(),
        MusicError::AmbiguousMatch(candidates) => {
            let mut message = "Can't determine song, it could be any of:".to_string();
            for candidate in candidates {
                message.push_str("\n- ");
                message.push_str(candidate);
            }
            message
        }
        MusicError::DuplicateVote => "You have already voted to skip this song.".to_string(),
        MusicError::NothingPlaying => "Not playing any music right now...".to_string(),
        other => format!("❌ {}", other),
    }
}

pub fn error(err: &MusicError) -> CreateReply {
    text(error_text(err))
}

pub fn enqueued_text(entry: &QueueEntry) -> String {
    format!("Enqueued {}", entry)
}

pub fn enqueued(entry: &QueueEntry) -> CreateReply {
    text(enqueued_text(entry))
}

pub fn queueing_new_song_text() -> String {
    "Queueing new song".to_string()
}

pub fn history_write_failed(err: &MusicError) -> CreateReply {
    text(format!("Couldn't save the song to history: {}", err))
}

pub fn ready_to_play(channel_name: &str) -> CreateReply {
    text(format!("Ready to play audio in {}", channel_name))
}

pub fn summoned(channel_name: &str) -> CreateReply {
    text(format!("Joined {}", channel_name))
}

/// Reply for a skip request that didn't fail
pub fn skip_outcome(outcome: &SkipOutcome) -> CreateReply {
    let message = match outcome {
        SkipOutcome::Elevated | SkipOutcome::Autoplay => "Skipped".to_string(),
        SkipOutcome::Requester => "Requester requested skipping song...".to_string(),
        SkipOutcome::VotePassed { .. } => "Skip vote passed, skipping song...".to_string(),
        SkipOutcome::VoteAdded { votes, required } => {
            format!("Skip vote added, currently at [{}/{}]", votes, required)
        }
    };
    text(message)
}

pub fn now_playing(current: Option<&QueueEntry>, votes: usize, required: usize) -> CreateReply {
    match current {
        Some(entry) => {
            let mut embed = CreateEmbed::new()
                .title("🎵 Now Playing")
                .description(entry.to_string())
                .field("Skips", format!("`{}/{}`", votes, required), true)
                .color(0x00ff00);
            if let Some(thumbnail) = &entry.metadata().thumbnail {
                embed = embed.thumbnail(thumbnail);
            }
            CreateReply::default()
                .content(format!("Now playing {} [skips: {}/{}]", entry, votes, required))
                .embed(embed)
        }
        None => text("Not playing anything."),
    }
}

/// The numbered pending queue, or a notice that it's empty
pub fn queue_listing(descriptions: &[String]) -> String {
    if descriptions.is_empty() {
        return "No songs queued".to_string();
    }

    descriptions
        .iter()
        .enumerate()
        .map(|(index, description)| format!("{}: {}", index + 1, description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn removed(entry: &QueueEntry) -> CreateReply {
    text(format!("Removing {}", entry))
}

pub fn moved(from: usize, to: usize) -> CreateReply {
    text(format!("Moved song {} to position {}", from, to))
}

pub fn volume_set(volume: f32) -> CreateReply {
    text(format!("Set the volume to {:.0}%", volume * 100.0))
}

pub fn paused() -> CreateReply {
    text("⏸️ Paused")
}

pub fn resumed() -> CreateReply {
    text("▶️ Resumed")
}

pub fn stopped() -> CreateReply {
    text("🛑 Stopped playback, cleared the queue and left the voice channel")
}

pub fn autoplay_started() -> CreateReply {
    text("Autoplay is on")
}

pub fn autoplay_stopped(was_running: bool) -> CreateReply {
    if was_running {
        text("Autoplay is off")
    } else {
        text("Autoplay wasn't running")
    }
}

pub fn not_enough_history(required: usize) -> CreateReply {
    text(format!(
        "Autoplay is on, but it needs at least {} different songs in the history before it can pick one",
        required
    ))
}
