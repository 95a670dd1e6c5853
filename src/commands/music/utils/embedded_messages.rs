use poise::CreateReply;
use serenity::all::CreateEmbed;

use super::{
    format_duration,
    music_manager::MusicError,
    voice_state::{NowPlaying, SKIP_VOTE_THRESHOLD, SkipOutcome},
};
use crate::commands::music::audio_sources::ResolveError;

const SUCCESS_COLOR: u32 = 0x00ff00;
const INFO_COLOR: u32 = 0x3498db;
const ERROR_COLOR: u32 = 0xff0000;

fn reply(title: &str, description: impl Into<String>, color: u32) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(title)
            .description(description)
            .color(color),
    )
}

/// Text reported back to the voter for a skip request
pub fn skip_message(outcome: SkipOutcome) -> String {
    match outcome {
        SkipOutcome::RequesterSkipped => "Requested to skip a song".to_string(),
        SkipOutcome::VotePassed => "**Skip successful**".to_string(),
        SkipOutcome::VoteAdded { votes } => format!(
            "Skip vote added, currently at [{}/{}]",
            votes, SKIP_VOTE_THRESHOLD
        ),
        SkipOutcome::AlreadyVoted { votes } => format!(
            "**You already voted to skip** [{}/{}]",
            votes, SKIP_VOTE_THRESHOLD
        ),
    }
}

/// Text describing the current track and its vote tally
pub fn now_playing_message(status: &NowPlaying) -> String {
    format!(
        "**Now playing** {} [skips: {}/{}]",
        status.entry, status.skip_votes, SKIP_VOTE_THRESHOLD
    )
}

/// Text shown when a query cannot be resolved
pub fn resolution_failed_message(err: &ResolveError) -> String {
    format!(
        "**An error occurred while processing this request:** ```\n{}: {}\n```",
        err.kind(),
        err
    )
}

/// Create an embed for when a song is added to the queue
pub fn enqueued(entry_description: &str, position: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎵 Enqueued")
            .description(entry_description)
            .field("Position", format!("`#{}`", position), true)
            .color(SUCCESS_COLOR),
    )
}

pub fn now_playing(status: &NowPlaying) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(now_playing_message(status))
        .field("Up next", format!("`{} tracks`", status.queued), true)
        .color(SUCCESS_COLOR);

    if let Some(duration) = status.entry.metadata().duration {
        embed = embed.field("Duration", format!("`{}`", format_duration(duration)), true);
    }
    if let Some(url) = &status.entry.metadata().url {
        embed = embed.url(url);
    }

    CreateReply::default().embed(embed)
}

pub fn nothing_playing() -> CreateReply {
    reply("🔇 Nothing playing", "**Not playing a song**", INFO_COLOR)
}

pub fn skip_result(outcome: SkipOutcome) -> CreateReply {
    let title = match outcome {
        SkipOutcome::RequesterSkipped | SkipOutcome::VotePassed => "⏭️ Skipped Track",
        SkipOutcome::VoteAdded { .. } | SkipOutcome::AlreadyVoted { .. } => "🗳️ Skip Vote",
    };
    reply(title, skip_message(outcome), SUCCESS_COLOR)
}

pub fn volume_set(gain: f32) -> CreateReply {
    reply(
        "🔊 Volume",
        format!("Set the volume to {:.0}%", gain * 100.0),
        SUCCESS_COLOR,
    )
}

pub fn paused() -> CreateReply {
    reply("⏸️ Paused", "Paused the current song", SUCCESS_COLOR)
}

pub fn resumed() -> CreateReply {
    reply("▶️ Resumed", "Resumed the current song", SUCCESS_COLOR)
}

pub fn stopped() -> CreateReply {
    reply(
        "🛑 Stopped",
        "Stopped playback, cleared the queue and left the voice channel",
        SUCCESS_COLOR,
    )
}

pub fn joined(channel_name: &str) -> CreateReply {
    reply(
        "🔈 Joined",
        format!("**Ready to play music in** {}", channel_name),
        SUCCESS_COLOR,
    )
}

pub fn summoned(channel_mention: &str) -> CreateReply {
    reply(
        "🔈 Summoned",
        format!("**Ready to play music in** {}", channel_mention),
        SUCCESS_COLOR,
    )
}

pub fn resolution_failed(err: &ResolveError) -> CreateReply {
    reply("❌ Error", resolution_failed_message(err), ERROR_COLOR)
}

/// Create an embed for a music command that could not be carried out
pub fn music_error(err: &MusicError) -> CreateReply {
    let (title, color) = match err {
        MusicError::NotPlaying => ("🔇 Nothing playing", INFO_COLOR),
        _ => ("❌ Error", ERROR_COLOR),
    };
    reply(title, err.to_string(), color).ephemeral(true)
}
