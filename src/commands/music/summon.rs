use super::*;
use crate::commands::music::utils::{music_manager::user_voice_channel, voice_state::GuildVoiceState};
use serenity::model::id::ChannelId;

/// Summons the bot to join your voice channel.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn summon(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let state = ctx.data().registry.get_or_create(guild_id);

    match summon_author(ctx, &state).await {
        Ok(channel_id) => {
            ctx.send(embedded_messages::summoned(&format!("<#{}>", channel_id)))
                .await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
        }
    }

    Ok(())
}

/// Connect (or move) the guild's voice session to the command author's voice channel
pub(crate) async fn summon_author(
    ctx: Context<'_>,
    state: &GuildVoiceState,
) -> MusicResult<ChannelId> {
    let channel_id = user_voice_channel(ctx.serenity_context(), state.guild_id(), ctx.author().id)?;
    state.summon(ctx.data().voice.as_ref(), channel_id).await?;
    Ok(channel_id)
}
