use super::*;

/// Vote to skip a song. The song requester can automatically skip.
///
/// 3 skip votes are needed for the song to be skipped.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let result = match ctx.data().registry.get(guild_id) {
        Some(state) => state.skip(ctx.author().id).await,
        None => Err(MusicError::NotPlaying),
    };

    match result {
        Ok(outcome) => ctx.send(embedded_messages::skip_result(outcome)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
