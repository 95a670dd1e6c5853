//! Player handles and the completion signal that advances a guild's playback loop.

use serenity::async_trait;
use serenity::model::id::GuildId;
use songbird::input::Input;
use songbird::tracks::{ControlError, Track, TrackHandle};
use songbird::{Event, EventContext, Songbird, TrackEvent};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use super::music_manager::{MusicError, MusicResult};

/// Gain applied to every track when it starts
pub const DEFAULT_VOLUME: f32 = 0.6;

/// A controllable audio stream.
///
/// Ending the stream, whether it runs out or is stopped, must notify the
/// [`CompletionHook`] it was created with exactly once.
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Begin streaming. Only the first call starts anything.
    async fn start(&self) -> MusicResult<()>;

    fn pause(&self);

    fn resume(&self);

    /// Forcibly end playback and fire the completion signal immediately.
    fn stop(&self);

    fn is_done(&self) -> bool;

    /// Linear gain applied to the live stream
    fn set_volume(&self, volume: f32);
}

/// Single-slot signal a guild's playback loop waits on while a track plays.
pub struct CompletionSignal {
    tx: mpsc::Sender<()>,
    rx: Mutex<mpsc::Receiver<()>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// A handle players use to wake the loop
    pub fn hook(&self) -> CompletionHook {
        CompletionHook(self.tx.clone())
    }

    /// Drop a pending completion, if any.
    pub async fn clear(&self) {
        let mut rx = self.rx.lock().await;
        while rx.try_recv().is_ok() {}
    }

    /// Wait until a completion is pending and consume it.
    pub async fn wait(&self) {
        let mut rx = self.rx.lock().await;
        // The signal owns a sender, so the channel never closes while we wait.
        let _ = rx.recv().await;
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct CompletionHook(mpsc::Sender<()>);

impl CompletionHook {
    pub fn notify(&self) {
        if self.0.try_send(()).is_err() {
            debug!("Completion signal already pending, ignoring extra notification");
        }
    }
}

/// Tracks whether a stream has finished and makes sure the loop hears about it once.
#[derive(Debug)]
pub struct PlaybackCompletion {
    done: AtomicBool,
    hook: CompletionHook,
}

impl PlaybackCompletion {
    pub fn new(hook: CompletionHook) -> Arc<Self> {
        Arc::new(Self {
            done: AtomicBool::new(false),
            hook,
        })
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Mark the stream finished. Returns `false` if it already was.
    pub fn finish(&self) -> bool {
        if self.done.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.hook.notify();
        true
    }
}

/// Commands a started track accepts
pub trait TrackControl {
    type Error: fmt::Display;

    fn pause(&self) -> Result<(), Self::Error>;
    fn play(&self) -> Result<(), Self::Error>;
    fn stop(&self) -> Result<(), Self::Error>;
    fn set_volume(&self, volume: f32) -> Result<(), Self::Error>;
}

impl TrackControl for TrackHandle {
    type Error = ControlError;

    fn pause(&self) -> Result<(), Self::Error> {
        TrackHandle::pause(self)
    }

    fn play(&self) -> Result<(), Self::Error> {
        TrackHandle::play(self)
    }

    fn stop(&self) -> Result<(), Self::Error> {
        TrackHandle::stop(self)
    }

    fn set_volume(&self, volume: f32) -> Result<(), Self::Error> {
        TrackHandle::set_volume(self, volume)
    }
}

struct TrackSlot<T> {
    track: Option<T>,
    volume: f32,
    paused: bool,
    stopped: bool,
}

/// Volume, pause and stop requests for a track that may not exist yet.
///
/// Requests made before [`Self::attach`] are remembered and applied to the
/// track when it arrives; afterwards they go straight to it. One lock covers
/// both sides, so a stop never misses the track.
pub struct PendingTrack<T> {
    slot: StdMutex<TrackSlot<T>>,
}

impl<T: TrackControl> PendingTrack<T> {
    pub fn new(volume: f32) -> Self {
        Self {
            slot: StdMutex::new(TrackSlot {
                track: None,
                volume,
                paused: false,
                stopped: false,
            }),
        }
    }

    fn slot(&self) -> MutexGuard<'_, TrackSlot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gain the track should play at
    pub fn volume(&self) -> f32 {
        self.slot().volume
    }

    /// Hand over the started track. Returns `false`, after stopping the
    /// track, if a stop was requested first.
    pub fn attach(&self, track: T) -> bool {
        let mut slot = self.slot();
        if slot.stopped {
            log_failure("stop", track.stop());
            return false;
        }

        log_failure("set volume", track.set_volume(slot.volume));
        if slot.paused {
            log_failure("pause", track.pause());
        }
        slot.track = Some(track);
        true
    }

    pub fn pause(&self) {
        let mut slot = self.slot();
        slot.paused = true;
        if let Some(track) = &slot.track {
            log_failure("pause", track.pause());
        }
    }

    pub fn resume(&self) {
        let mut slot = self.slot();
        slot.paused = false;
        if let Some(track) = &slot.track {
            log_failure("resume", track.play());
        }
    }

    pub fn set_volume(&self, volume: f32) {
        let mut slot = self.slot();
        slot.volume = volume;
        if let Some(track) = &slot.track {
            log_failure("set volume", track.set_volume(volume));
        }
    }

    /// Stop the track now, or as soon as it is attached.
    pub fn stop(&self) {
        let mut slot = self.slot();
        slot.stopped = true;
        if let Some(track) = slot.track.take() {
            if let Err(e) = track.stop() {
                debug!("Track was already stopped: {}", e);
            }
        }
    }
}

fn log_failure<E: fmt::Display>(action: &str, result: Result<(), E>) {
    if let Err(e) = result {
        warn!("Failed to {} track: {}", action, e);
    }
}

/// Player backed by a songbird track in the guild's current call.
pub struct SongbirdPlayer {
    manager: Arc<Songbird>,
    guild_id: GuildId,
    input: Mutex<Option<Input>>,
    track: PendingTrack<TrackHandle>,
    completion: Arc<PlaybackCompletion>,
}

impl SongbirdPlayer {
    pub fn new(
        manager: Arc<Songbird>,
        guild_id: GuildId,
        input: Input,
        on_complete: CompletionHook,
    ) -> Self {
        Self {
            manager,
            guild_id,
            input: Mutex::new(Some(input)),
            track: PendingTrack::new(DEFAULT_VOLUME),
            completion: PlaybackCompletion::new(on_complete),
        }
    }
}

#[async_trait]
impl PlayerHandle for SongbirdPlayer {
    async fn start(&self) -> MusicResult<()> {
        let input = self
            .input
            .lock()
            .await
            .take()
            .ok_or_else(|| MusicError::PlaybackError("Player was already started".to_string()))?;

        let call = self.manager.get(self.guild_id).ok_or(MusicError::NotConnected)?;

        let handle = {
            let mut handler = call.lock().await;
            handler.play(Track::from(input).volume(self.track.volume()))
        };

        for event in [TrackEvent::End, TrackEvent::Error] {
            let notifier = TrackEndNotifier {
                guild_id: self.guild_id,
                completion: Arc::clone(&self.completion),
            };
            if let Err(e) = handle.add_event(Event::Track(event), notifier) {
                let _ = handle.stop();
                return Err(MusicError::PlaybackError(e.to_string()));
            }
        }

        // Stopped while we were waiting on the call
        if !self.track.attach(handle) {
            debug!("Track in guild {} was stopped before it started", self.guild_id);
        }

        Ok(())
    }

    fn pause(&self) {
        self.track.pause();
    }

    fn resume(&self) {
        self.track.resume();
    }

    fn stop(&self) {
        self.track.stop();
        self.completion.finish();
    }

    fn is_done(&self) -> bool {
        self.completion.is_done()
    }

    fn set_volume(&self, volume: f32) {
        self.track.set_volume(volume);
    }
}

/// Event handler for when a song ends or errors out
struct TrackEndNotifier {
    guild_id: GuildId,
    completion: Arc<PlaybackCompletion>,
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(_) = ctx {
            if self.completion.finish() {
                debug!("Track ended for guild {}", self.guild_id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::time::Duration;

    /// Track that logs every command it receives
    #[derive(Clone, Default)]
    struct RecordingTrack(Arc<StdMutex<Vec<String>>>);

    impl RecordingTrack {
        fn commands(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        fn record(&self, command: String) -> Result<(), Infallible> {
            self.0.lock().unwrap().push(command);
            Ok(())
        }
    }

    impl TrackControl for RecordingTrack {
        type Error = Infallible;

        fn pause(&self) -> Result<(), Infallible> {
            self.record("pause".to_string())
        }

        fn play(&self) -> Result<(), Infallible> {
            self.record("play".to_string())
        }

        fn stop(&self) -> Result<(), Infallible> {
            self.record("stop".to_string())
        }

        fn set_volume(&self, volume: f32) -> Result<(), Infallible> {
            self.record(format!("volume {}", volume))
        }
    }

    #[test]
    fn test_requests_before_attach_reach_the_track() {
        let pending = PendingTrack::new(DEFAULT_VOLUME);
        pending.set_volume(1.5);
        pending.pause();
        assert_eq!(pending.volume(), 1.5);

        let track = RecordingTrack::default();
        assert!(pending.attach(track.clone()));

        assert_eq!(track.commands(), vec!["volume 1.5", "pause"]);
    }

    #[test]
    fn test_requests_after_attach_go_straight_through() {
        let pending = PendingTrack::new(DEFAULT_VOLUME);
        let track = RecordingTrack::default();
        assert!(pending.attach(track.clone()));

        pending.pause();
        pending.resume();
        pending.set_volume(0.25);
        pending.stop();
        // Nothing left to stop
        pending.stop();

        assert_eq!(
            track.commands(),
            vec!["volume 0.6", "pause", "play", "volume 0.25", "stop"]
        );
    }

    #[test]
    fn test_stop_before_attach_stops_the_late_track() {
        let pending = PendingTrack::new(DEFAULT_VOLUME);
        pending.stop();

        let track = RecordingTrack::default();
        assert!(!pending.attach(track.clone()));
        assert_eq!(track.commands(), vec!["stop"]);

        pending.set_volume(1.0);
        assert_eq!(track.commands(), vec!["stop"]);
    }

    #[test]
    fn test_completion_fires_once() {
        let signal = CompletionSignal::new();
        let completion = PlaybackCompletion::new(signal.hook());

        assert!(!completion.is_done());
        assert!(completion.finish());
        assert!(!completion.finish());
        assert!(completion.is_done());
    }

    #[tokio::test]
    async fn test_wait_consumes_pending_completion() {
        let signal = CompletionSignal::new();
        signal.hook().notify();

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("pending completion should wake the waiter");
    }

    #[tokio::test]
    async fn test_clear_drops_stale_completion() {
        let signal = CompletionSignal::new();
        let hook = signal.hook();
        hook.notify();
        // Single slot: the second notification is dropped
        hook.notify();

        signal.clear().await;

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(waited.is_err(), "cleared signal must not wake the waiter");
    }
}
