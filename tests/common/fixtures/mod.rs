//! Sample users, channels and settings shared by the tests

use dakbot::commands::music::utils::autoplay_manager::AutoplaySettings;
use dakbot::commands::music::utils::playback_state::PlaybackSettings;
use dakbot::commands::music::utils::queue_manager::Requester;
use dakbot::commands::music::utils::skip_vote::{SkipPolicy, Voter};
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::time::Duration;

pub const GUILD_ID: u64 = 4242;
pub const TEXT_CHANNEL_ID: u64 = 987654321;
pub const BOT_ID: u64 = 1;
pub const ALICE_ID: u64 = 100;
pub const BOB_ID: u64 = 200;

pub fn guild() -> GuildId {
    GuildId::new(GUILD_ID)
}

pub fn text_channel() -> ChannelId {
    ChannelId::new(TEXT_CHANNEL_ID)
}

pub fn alice() -> Requester {
    Requester::member(UserId::new(ALICE_ID), "alice")
}

pub fn bob() -> Requester {
    Requester::member(UserId::new(BOB_ID), "bob")
}

pub fn bot() -> Requester {
    Requester::autoplay(UserId::new(BOT_ID), "DakBot")
}

/// A member without any roles
pub fn listener(id: u64) -> Voter {
    Voter::new(UserId::new(id), Vec::new())
}

pub fn dj(id: u64) -> Voter {
    Voter::new(UserId::new(id), vec!["dj".to_string()])
}

pub fn playback_settings() -> PlaybackSettings {
    PlaybackSettings {
        skip_policy: SkipPolicy::default(),
        default_volume: 0.6,
    }
}

/// Autoplay that reacts quickly enough for tests
pub fn fast_autoplay() -> AutoplaySettings {
    AutoplaySettings {
        interval: Duration::from_millis(10),
        ..AutoplaySettings::default()
    }
}
