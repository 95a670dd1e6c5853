use ::serenity::all::ClientBuilder;
use poise::serenity_prelude as serenity;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use telluric::commands::music::{
    self,
    audio_sources::youtube::YtDlpResolver,
    utils::{notifier::ChannelNotifier, registry::VoiceRegistry, voice::SongbirdTransport},
};
use telluric::config::Config;
use telluric::{CommandResult, Context, Data, Error};

#[poise::command(slash_command, category = "General")]
async fn help(
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
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("telluric=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    let config = Config::from_env()?;

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let songbird = Songbird::serenity();
    let voice = Arc::new(SongbirdTransport::new(Arc::clone(&songbird)));
    let resolver = Arc::new(YtDlpResolver::new(
        Arc::clone(&songbird),
        reqwest::Client::new(),
    ));

    let mut commands = vec![
        // Default commands
        register(),
        help(),
    ];
    commands.extend(music::commands());

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                mention_as_prefix: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // Announcements share the client's HTTP client and rate limits
                let notifier = Arc::new(ChannelNotifier::new(Arc::clone(&ctx.http)));
                let registry = Arc::new(VoiceRegistry::new(notifier));
                spawn_shutdown_handler(
                    Arc::clone(&registry),
                    Arc::clone(framework.shard_manager()),
                );

                Ok(Data {
                    registry,
                    voice,
                    resolver,
                })
            })
        });

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework.build())
        .register_songbird_with(songbird)
        .await?;

    client.start().await.map_err(Into::into)
}

/// On Ctrl-C, tear down every guild's playback before the gateway goes away.
fn spawn_shutdown_handler(registry: Arc<VoiceRegistry>, shard_manager: Arc<serenity::ShardManager>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        let stopped = registry.shutdown_all().await;
        info!("Stopped playback in {} guild(s), shutting down", stopped);
        shard_manager.shutdown_all().await;
    });
}
