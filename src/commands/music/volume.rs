use super::*;

/// Sets the volume of the currently playing song.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume in percent"] value: u32,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let result = match ctx.data().registry.get(guild_id) {
        Some(state) => state.set_volume(value).await,
        None => Err(MusicError::NotPlaying),
    };

    match result {
        Ok(gain) => ctx.send(embedded_messages::volume_set(gain)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
