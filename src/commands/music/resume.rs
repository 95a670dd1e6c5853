use super::*;

/// Resumes the currently played song.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let result = match ctx.data().registry.get(guild_id) {
        Some(state) => state.resume().await,
        None => Err(MusicError::NotPlaying),
    };

    match result {
        Ok(()) => ctx.send(embedded_messages::resumed()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
