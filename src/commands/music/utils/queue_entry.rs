use serenity::model::id::{ChannelId, UserId};
use std::fmt;
use std::sync::Arc;

use super::player::PlayerHandle;
use crate::commands::music::audio_sources::{ResolvedSong, TrackMetadata};

/// A requested track waiting in, or consumed from, a guild's queue.
///
/// Entries are never modified after creation.
pub struct QueueEntry {
    requester: UserId,
    requester_name: String,
    channel_id: ChannelId,
    player: Arc<dyn PlayerHandle>,
    metadata: TrackMetadata,
}

impl QueueEntry {
    pub fn new(
        requester: UserId,
        requester_name: impl Into<String>,
        channel_id: ChannelId,
        song: ResolvedSong,
    ) -> Self {
        Self {
            requester,
            requester_name: requester_name.into(),
            channel_id,
            player: song.player,
            metadata: song.metadata,
        }
    }

    pub fn requester(&self) -> UserId {
        self.requester
    }

    pub fn requester_name(&self) -> &str {
        &self.requester_name
    }

    /// Where "now playing" is announced for this entry
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub fn player(&self) -> &dyn PlayerHandle {
        self.player.as_ref()
    }

    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }
}

impl fmt::Display for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}**", self.metadata.title)?;
        match &self.metadata.uploader {
            Some(uploader) => write!(
                f,
                " uploaded by **{}** and requested by **{}**",
                uploader, self.requester_name
            )?,
            None => write!(f, " requested by **{}**", self.requester_name)?,
        }

        if let Some(duration) = self.metadata.duration {
            let seconds = duration.as_secs();
            write!(f, " [length: {}m {}s]", seconds / 60, seconds % 60)?;
        }
        Ok(())
    }
}

impl fmt::Debug for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEntry")
            .field("requester", &self.requester)
            .field("channel_id", &self.channel_id)
            .field("title", &self.metadata.title)
            .field("done", &self.player.is_done())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::music::utils::player::{CompletionSignal, PlaybackCompletion};
    use crate::commands::music::utils::music_manager::MusicResult;
    use serenity::async_trait;
    use std::time::Duration;
    use test_case::test_case;

    struct SilentPlayer(Arc<PlaybackCompletion>);

    #[async_trait]
    impl PlayerHandle for SilentPlayer {
        async fn start(&self) -> MusicResult<()> {
            Ok(())
        }
        fn pause(&self) {}
        fn resume(&self) {}
        fn stop(&self) {
            self.0.finish();
        }
        fn is_done(&self) -> bool {
            self.0.is_done()
        }
        fn set_volume(&self, _volume: f32) {}
    }

    fn entry(uploader: Option<&str>, duration: Option<u64>) -> QueueEntry {
        let signal = CompletionSignal::new();
        let song = ResolvedSong {
            player: Arc::new(SilentPlayer(PlaybackCompletion::new(signal.hook()))),
            metadata: TrackMetadata {
                title: "Clair de Lune".to_string(),
                uploader: uploader.map(str::to_string),
                url: None,
                duration: duration.map(Duration::from_secs),
            },
        };
        QueueEntry::new(UserId::new(7), "Ada", ChannelId::new(9), song)
    }

    #[test_case(Some("Debussy"), Some(302), "**Clair de Lune** uploaded by **Debussy** and requested by **Ada** [length: 5m 2s]" ; "full metadata")]
    #[test_case(Some("Debussy"), None, "**Clair de Lune** uploaded by **Debussy** and requested by **Ada**" ; "live stream")]
    #[test_case(None, Some(59), "**Clair de Lune** requested by **Ada** [length: 0m 59s]" ; "unknown uploader")]
    fn test_display(uploader: Option<&str>, duration: Option<u64>, expected: &str) {
        assert_eq!(entry(uploader, duration).to_string(), expected);
    }

    #[test]
    fn test_accessors() {
        let entry = entry(None, None);
        assert_eq!(entry.requester(), UserId::new(7));
        assert_eq!(entry.requester_name(), "Ada");
        assert_eq!(entry.channel_id(), ChannelId::new(9));
        assert!(!entry.player().is_done());
    }
}
