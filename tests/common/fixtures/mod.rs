//! Test fixtures: ids and queue entries backed by fake players

use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;
use std::time::Duration;

use telluric::commands::music::audio_sources::{ResolvedSong, TrackMetadata};
use telluric::commands::music::utils::player::CompletionHook;
use telluric::commands::music::utils::queue_entry::QueueEntry;

use super::mocks::FakePlayer;

pub const GUILD: GuildId = GuildId::new(1111);
pub const OTHER_GUILD: GuildId = GuildId::new(2222);
pub const THIRD_GUILD: GuildId = GuildId::new(3333);

pub const TEXT_CHANNEL: ChannelId = ChannelId::new(500);
pub const VOICE_CHANNEL: ChannelId = ChannelId::new(600);
pub const OTHER_VOICE_CHANNEL: ChannelId = ChannelId::new(601);

/// Requester of every fixture entry
pub const REQUESTER: UserId = UserId::new(10);
pub const LISTENER_A: UserId = UserId::new(21);
pub const LISTENER_B: UserId = UserId::new(22);
pub const LISTENER_C: UserId = UserId::new(23);

pub fn metadata(title: &str) -> TrackMetadata {
    TrackMetadata {
        title: title.to_string(),
        uploader: Some("Test Uploader".to_string()),
        url: Some(format!("https://example.com/{}", title)),
        duration: Some(Duration::from_secs(185)),
    }
}

/// An entry requested by [`REQUESTER`] whose player reports to `hook`
pub fn entry(title: &str, hook: CompletionHook) -> (QueueEntry, Arc<FakePlayer>) {
    with_player(title, FakePlayer::new(hook))
}

/// An entry whose player fails to start
pub fn broken_entry(title: &str, hook: CompletionHook) -> (QueueEntry, Arc<FakePlayer>) {
    with_player(title, FakePlayer::failing(hook))
}

fn with_player(title: &str, player: Arc<FakePlayer>) -> (QueueEntry, Arc<FakePlayer>) {
    let song = ResolvedSong {
        player: player.clone(),
        metadata: metadata(title),
    };
    (
        QueueEntry::new(REQUESTER, "Ada", TEXT_CHANNEL, song),
        player,
    )
}
