use super::*;

/// Pauses the currently played song.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let result = match ctx.data().registry.get(guild_id) {
        Some(state) => state.pause().await,
        None => Err(MusicError::NotPlaying),
    };

    match result {
        Ok(()) => ctx.send(embedded_messages::paused()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
