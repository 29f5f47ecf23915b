//! DakBot: a Discord music bot that queues YouTube audio per guild, with
//! democratic skip voting and an autoplay fallback fed by past requests.

pub mod commands;
pub mod config;

use std::sync::Arc;

use commands::music::audio_sources::MediaResolver;
use commands::music::utils::autoplay_manager::AutoplayManager;
use commands::music::utils::coordinator::PlaybackCoordinator;
use commands::music::utils::history::SongHistory;
use commands::music::utils::playback_state::Announcer;
use config::BotConfig;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub config: BotConfig,
    pub coordinator: Arc<PlaybackCoordinator>,
    pub resolver: Arc<dyn MediaResolver>,
    pub history: Arc<SongHistory>,
    pub autoplay: AutoplayManager,
    pub announcer: Arc<dyn Announcer>,
    /// Shared with songbird's `YoutubeDl` sources
    pub http_client: reqwest::Client,
}

#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
pub async fn register(ctx: Context<'_>) -> CommandResult {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Every command the bot registers with the framework
pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    use commands::music::{
        autoplay::*, join::*, move_track::*, now_playing::*, pause::*, play::*, queue::*,
        remove::*, skip::*, stop::*, volume::*,
    };

    vec![
        // Default commands
        register(),
        help(),
        // Music commands
        join(),
        summon(),
        play(),
        volume(),
        pause(),
        resume(),
        stop(),
        skip(),
        now_playing(),
        queue(),
        remove(),
        move_track(),
        start_autoplay(),
        stop_autoplay(),
    ]
}
