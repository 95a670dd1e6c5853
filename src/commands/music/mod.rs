//! Music commands. Each command resolves the guild's voice state from the
//! registry and calls one operation on it.

pub mod audio_sources;
pub mod utils;

pub(crate) mod join;
pub(crate) mod pause;
pub(crate) mod play;
pub(crate) mod playing;
pub(crate) mod resume;
pub(crate) mod skip;
pub(crate) mod stop;
pub(crate) mod summon;
pub(crate) mod volume;

use serenity::model::id::GuildId;

use crate::{CommandResult, Context, Data, Error};
use utils::{
    embedded_messages,
    music_manager::{MusicError, MusicResult},
};

/// Every music command, in the order they are shown in help
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        play::play(),
        join::join(),
        summon::summon(),
        volume::volume(),
        pause::pause(),
        resume::resume(),
        stop::stop(),
        skip::skip(),
        playing::playing(),
    ]
}

fn guild_id(ctx: Context<'_>) -> MusicResult<GuildId> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}
