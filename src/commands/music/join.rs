use super::*;
use serenity::model::channel::{ChannelType, GuildChannel};

/// Joins a voice channel.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn join(
    ctx: Context<'_>,
    #[description = "Voice channel to join"] channel: GuildChannel,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if !matches!(channel.kind, ChannelType::Voice | ChannelType::Stage) {
        let err = MusicError::NotAVoiceChannel(channel.name.clone());
        ctx.send(embedded_messages::music_error(&err)).await?;
        return Ok(());
    }

    let state = ctx.data().registry.get_or_create(guild_id);
    match state.connect(ctx.data().voice.as_ref(), channel.id).await {
        Ok(()) => {
            ctx.send(embedded_messages::joined(&channel.name)).await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
        }
    }

    Ok(())
}
