use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dakbot::commands::music::audio_sources::YoutubeResolver;
use dakbot::commands::music::utils::autoplay_manager::AutoplayManager;
use dakbot::commands::music::utils::coordinator::PlaybackCoordinator;
use dakbot::commands::music::utils::history::SongHistory;
use dakbot::commands::music::utils::playback_state::{
    Announcer, HttpAnnouncer, PlaybackSettings,
};
use dakbot::config::BotConfig;
use dakbot::{Data, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dakbot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env().inspect_err(|e| error!("{}", e))?;

    let history = Arc::new(SongHistory::load(&config.history_path).await?);

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let token = config.discord_token.clone();
    let prefix = config.command_prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: dakbot::all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                mention_as_prefix: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Logged in as {}", ready.user.name);

                let http_client = reqwest::Client::new();
                let announcer: Arc<dyn Announcer> = Arc::new(HttpAnnouncer::new(ctx.http.clone()));
                let settings = PlaybackSettings {
                    skip_policy: config.skip_policy.clone(),
                    default_volume: config.default_volume,
                };

                Ok(Data {
                    coordinator: Arc::new(PlaybackCoordinator::new(
                        settings,
                        Arc::clone(&announcer),
                    )),
                    resolver: Arc::new(YoutubeResolver::new(http_client.clone())),
                    history,
                    autoplay: AutoplayManager::new(config.autoplay.clone()),
                    announcer,
                    http_client,
                    config,
                })
            })
        });

    // Create and run client
    let mut client = ClientBuilder::new(token, intents)
        .framework(framework.build())
        .register_songbird()
        .await?;
    client.start().await.map_err(Into::into)
}
