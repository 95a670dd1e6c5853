use super::*;
use crate::commands::music::{
    audio_sources::ResolveOptions,
    summon::summon_author,
    utils::queue_entry::QueueEntry,
};
use tracing::{error, info};

/// Plays a song.
///
/// If a song is already playing, the new one is queued until the songs
/// before it are done. Plain text is searched for automatically.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    song: String,
) -> CommandResult {
    info!("Received play command with query: {}", song);
    let guild_id = guild_id(ctx)?;
    let state = ctx.data().registry.get_or_create(guild_id);

    // Join the author's voice channel if not already connected
    if !state.is_connected().await {
        if let Err(err) = summon_author(ctx, &state).await {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    }

    // Resolving can take a while
    ctx.defer().await?;

    let options = ResolveOptions::default();
    let resolved = match ctx
        .data()
        .resolver
        .resolve(guild_id, &song, &options, state.completion_hook())
        .await
    {
        Ok(resolved) => resolved,
        Err(err) => {
            error!("Failed to resolve '{}' for guild {}: {}", song, guild_id, err);
            ctx.send(embedded_messages::resolution_failed(&err)).await?;
            return Ok(());
        }
    };

    let author = ctx.author();
    let entry = QueueEntry::new(
        author.id,
        author.display_name(),
        ctx.channel_id(),
        resolved,
    );
    let description = entry.to_string();

    // A stop may have closed this state while the query was resolving
    match state.enqueue(entry).await {
        Ok(position) => {
            ctx.send(embedded_messages::enqueued(&description, position))
                .await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
        }
    }

    Ok(())
}
