use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, UserId};
use thiserror::Error;

use crate::commands::music::audio_sources::ResolveError;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Already connected to a voice channel")]
    AlreadyConnected,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("{0} is not a voice channel")]
    NotAVoiceChannel(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Not playing any music right now")]
    NotPlaying,

    #[error("Playback was stopped in this guild, try again")]
    Stopped,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Failed to leave voice channel: {0}")]
    LeaveError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("{}: {}", .0.kind(), .0)]
    Resolution(#[from] ResolveError),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Get the voice channel ID that the user is currently in
pub fn user_voice_channel(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> MusicResult<ChannelId> {
    let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|voice_state| voice_state.channel_id)
        .ok_or(MusicError::UserNotInVoiceChannel)
}
