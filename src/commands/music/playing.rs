use super::*;

/// Shows info about the currently played song.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn playing(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let status = match ctx.data().registry.get(guild_id) {
        Some(state) => state.playing_status().await,
        None => None,
    };

    match status {
        Some(status) => ctx.send(embedded_messages::now_playing(&status)).await?,
        None => ctx.send(embedded_messages::nothing_playing()).await?,
    };

    Ok(())
}
