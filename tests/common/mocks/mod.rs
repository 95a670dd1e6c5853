//! Mock implementations for external dependencies
//! This module contains fakes and mockall mocks for players, voice and notifications

use async_trait::async_trait;
use mockall::mock;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use telluric::Error;
use telluric::commands::music::utils::music_manager::{MusicError, MusicResult};
use telluric::commands::music::utils::notifier::NotificationSink;
use telluric::commands::music::utils::player::{
    CompletionHook, DEFAULT_VOLUME, PlaybackCompletion, PlayerHandle,
};
use telluric::commands::music::utils::voice::{VoiceConnection, VoiceTransport};

/// In-memory player that records what was asked of it.
pub struct FakePlayer {
    completion: Arc<PlaybackCompletion>,
    fail_start: bool,
    start_count: AtomicUsize,
    paused: AtomicBool,
    volume: AtomicU32,
}

impl FakePlayer {
    pub fn new(hook: CompletionHook) -> Arc<Self> {
        Self::build(hook, false)
    }

    /// A player whose `start` always errors
    pub fn failing(hook: CompletionHook) -> Arc<Self> {
        Self::build(hook, true)
    }

    fn build(hook: CompletionHook, fail_start: bool) -> Arc<Self> {
        Arc::new(Self {
            completion: PlaybackCompletion::new(hook),
            fail_start,
            start_count: AtomicUsize::new(0),
            paused: AtomicBool::new(false),
            volume: AtomicU32::new(DEFAULT_VOLUME.to_bits()),
        })
    }

    /// The stream ran out on its own
    pub fn finish_naturally(&self) {
        self.completion.finish();
    }

    pub fn started(&self) -> bool {
        self.start_count() > 0
    }

    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::SeqCst))
    }

    /// Started and not finished
    pub fn is_live(&self) -> bool {
        self.started() && !self.is_done()
    }
}

#[async_trait]
impl PlayerHandle for FakePlayer {
    async fn start(&self) -> MusicResult<()> {
        self.start_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(MusicError::PlaybackError("stream unavailable".to_string()));
        }
        Ok(())
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.completion.finish();
    }

    fn is_done(&self) -> bool {
        self.completion.is_done()
    }

    fn set_volume(&self, volume: f32) {
        self.volume.store(volume.to_bits(), Ordering::SeqCst);
    }
}

/// Notification sink that keeps every announcement it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    announcements: Mutex<Vec<(ChannelId, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn announcements(&self) -> Vec<(ChannelId, String)> {
        self.announcements.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.announcements()
            .into_iter()
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn announce(&self, channel_id: ChannelId, text: String) -> Result<(), Error> {
        self.announcements.lock().unwrap().push((channel_id, text));
        Ok(())
    }
}

mock! {
    pub Notifier {}

    #[async_trait]
    impl NotificationSink for Notifier {
        async fn announce(&self, channel_id: ChannelId, text: String) -> Result<(), Error>;
    }
}

mock! {
    pub Connection {}

    #[async_trait]
    impl VoiceConnection for Connection {
        async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()>;
        async fn disconnect(&self) -> MusicResult<()>;
    }
}

mock! {
    pub Transport {}

    #[async_trait]
    impl VoiceTransport for Transport {
        async fn join(
            &self,
            guild_id: GuildId,
            channel_id: ChannelId,
        ) -> MusicResult<Box<dyn VoiceConnection>>;
    }
}

/// A connection that disconnects cleanly, counting how often it was asked to
pub fn counted_connection(disconnects: Arc<AtomicUsize>) -> MockConnection {
    let mut connection = MockConnection::new();
    connection.expect_disconnect().returning(move || {
        disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    connection
}

/// A transport whose joins hand out connections built by `make`
pub fn transport_with<F>(make: F) -> MockTransport
where
    F: Fn() -> MockConnection + Send + 'static,
{
    let mut transport = MockTransport::new();
    transport
        .expect_join()
        .returning(move |_, _| Ok(Box::new(make()) as Box<dyn VoiceConnection>));
    transport
}
