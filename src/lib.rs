//! Telluric: a chat bot whose music commands share one playback coordinator
//! per guild.

use std::sync::Arc;

pub mod commands;
pub mod config;

use commands::music::audio_sources::SongResolver;
use commands::music::utils::{registry::VoiceRegistry, voice::VoiceTransport};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    /// Per-guild playback coordinators
    pub registry: Arc<VoiceRegistry>,
    /// Connects the bot to voice channels
    pub voice: Arc<dyn VoiceTransport>,
    /// Turns a search query or URL into a playable track
    pub resolver: Arc<dyn SongResolver>,
}
