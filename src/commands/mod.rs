//! This module aggregates all the command modules for the bot.

/// Commands related to music playback in voice channels.
pub mod music;
