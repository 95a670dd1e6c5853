//! Per-guild playback coordination.
//!
//! A [`GuildVoiceState`] owns the guild's song queue, the entry currently
//! playing, the skip votes cast against it and the voice connection. One
//! background task per state drains the queue in order, waiting for each
//! track to complete before starting the next.

use serenity::model::id::{ChannelId, GuildId, UserId};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::music_manager::{MusicError, MusicResult};
use super::notifier::NotificationSink;
use super::player::{CompletionHook, CompletionSignal};
use super::queue_entry::QueueEntry;
use super::voice::{VoiceConnection, VoiceTransport};

/// Votes from listeners other than the requester needed to skip a track
pub const SKIP_VOTE_THRESHOLD: usize = 3;

/// Result of a skip request against a playing track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// The requester of the track skipped it
    RequesterSkipped,
    /// A vote was counted but the threshold is not reached yet
    VoteAdded { votes: usize },
    /// The vote reached the threshold and the track was skipped
    VotePassed,
    /// The voter had already voted on this track
    AlreadyVoted { votes: usize },
}

/// Snapshot of what a guild is playing
#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub entry: Arc<QueueEntry>,
    pub skip_votes: usize,
    pub queued: usize,
}

#[derive(Default)]
struct Playback {
    queue: VecDeque<Arc<QueueEntry>>,
    current: Option<Arc<QueueEntry>>,
    skip_votes: HashSet<UserId>,
    /// Set once by shutdown; nothing is queued afterwards
    closed: bool,
}

impl Playback {
    /// The current entry, if its player has not finished
    fn playing(&self) -> Option<&Arc<QueueEntry>> {
        self.current
            .as_ref()
            .filter(|entry| !entry.player().is_done())
    }
}

#[derive(Default)]
struct Voice {
    connection: Option<Box<dyn VoiceConnection>>,
    /// Set once by shutdown; no connection is made afterwards
    closed: bool,
}

pub struct GuildVoiceState {
    guild_id: GuildId,
    notifier: Arc<dyn NotificationSink>,
    playback: Mutex<Playback>,
    voice: Mutex<Voice>,
    queued: Notify,
    completion: CompletionSignal,
    loop_task: StdMutex<Option<JoinHandle<()>>>,
}

impl GuildVoiceState {
    /// Allocate a state without starting its playback loop; see [`Self::start`].
    pub fn new(guild_id: GuildId, notifier: Arc<dyn NotificationSink>) -> Arc<Self> {
        Arc::new(Self {
            guild_id,
            notifier,
            playback: Mutex::new(Playback::default()),
            voice: Mutex::new(Voice::default()),
            queued: Notify::new(),
            completion: CompletionSignal::new(),
            loop_task: StdMutex::new(None),
        })
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Spawn the background playback loop. Calling it again is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut task = self
            .loop_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if task.is_some() {
            warn!("Playback loop for guild {} is already running", self.guild_id);
            return;
        }

        let state = Arc::clone(self);
        *task = Some(tokio::spawn(async move { state.run().await }));
        info!("Started playback loop for guild {}", self.guild_id);
    }

    /// Whether the playback loop has been started and not cancelled.
    /// Diagnostic only; commands never branch on it.
    pub fn is_running(&self) -> bool {
        self.loop_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    async fn run(self: Arc<Self>) {
        loop {
            self.play_next().await;
        }
    }

    /// One turn of the playback loop: wait for an entry, play it and wait for it to complete.
    pub async fn play_next(&self) {
        self.completion.clear().await;

        let entry = self.next_entry().await;
        {
            let mut playback = self.playback.lock().await;
            playback.skip_votes.clear();
            playback.current = Some(Arc::clone(&entry));
        }

        info!(
            "Now playing '{}' in guild {}",
            entry.metadata().title,
            self.guild_id
        );

        let announcement = format!("**Now playing** {}", entry);
        if let Err(e) = self.notifier.announce(entry.channel_id(), announcement).await {
            warn!(
                "Failed to announce now playing for guild {}: {}",
                self.guild_id, e
            );
        }

        if let Err(e) = entry.player().start().await {
            error!(
                "Failed to start '{}' in guild {}: {}",
                entry.metadata().title,
                self.guild_id,
                e
            );
            entry.player().stop();
        }

        self.completion.wait().await;

        let mut playback = self.playback.lock().await;
        debug_assert!(
            playback.current.is_some(),
            "playback loop for guild {} woke without a current entry",
            self.guild_id
        );
        debug!(
            "Finished '{}' in guild {}",
            entry.metadata().title,
            self.guild_id
        );
        playback.current = None;
        playback.skip_votes.clear();
    }

    async fn next_entry(&self) -> Arc<QueueEntry> {
        loop {
            if let Some(entry) = self.playback.lock().await.queue.pop_front() {
                return entry;
            }
            self.queued.notified().await;
        }
    }

    /// Hook that wakes this state's loop; handed to players created for this guild.
    pub fn completion_hook(&self) -> CompletionHook {
        self.completion.hook()
    }

    /// Append an entry to the queue. Returns its position, 1 being next to play.
    ///
    /// Fails with [`MusicError::Stopped`] once the state has been shut down.
    pub async fn enqueue(&self, entry: QueueEntry) -> MusicResult<usize> {
        let position = {
            let mut playback = self.playback.lock().await;
            if playback.closed {
                return Err(MusicError::Stopped);
            }
            debug!(
                "Queueing '{}' for guild {}",
                entry.metadata().title,
                self.guild_id
            );
            playback.queue.push_back(Arc::new(entry));
            playback.queue.len()
        };
        self.queued.notify_one();
        Ok(position)
    }

    /// Number of entries waiting behind the current one
    pub async fn queued(&self) -> usize {
        self.playback.lock().await.queue.len()
    }

    pub async fn is_playing(&self) -> bool {
        self.playback.lock().await.playing().is_some()
    }

    /// Vote to skip the current track on behalf of `voter`.
    pub async fn skip(&self, voter: UserId) -> MusicResult<SkipOutcome> {
        let mut playback = self.playback.lock().await;
        let current = playback.playing().cloned().ok_or(MusicError::NotPlaying)?;

        if voter == current.requester() {
            info!(
                "Requester {} skipped '{}' in guild {}",
                voter,
                current.metadata().title,
                self.guild_id
            );
            playback.skip_votes.clear();
            current.player().stop();
            return Ok(SkipOutcome::RequesterSkipped);
        }

        if !playback.skip_votes.insert(voter) {
            return Ok(SkipOutcome::AlreadyVoted {
                votes: playback.skip_votes.len(),
            });
        }

        let votes = playback.skip_votes.len();
        if votes >= SKIP_VOTE_THRESHOLD {
            info!(
                "Skip vote passed for '{}' in guild {}",
                current.metadata().title,
                self.guild_id
            );
            playback.skip_votes.clear();
            current.player().stop();
            return Ok(SkipOutcome::VotePassed);
        }

        debug!(
            "Skip vote {}/{} from {} in guild {}",
            votes, SKIP_VOTE_THRESHOLD, voter, self.guild_id
        );
        Ok(SkipOutcome::VoteAdded { votes })
    }

    pub async fn pause(&self) -> MusicResult<()> {
        let playback = self.playback.lock().await;
        let current = playback.playing().ok_or(MusicError::NotPlaying)?;
        current.player().pause();
        Ok(())
    }

    pub async fn resume(&self) -> MusicResult<()> {
        let playback = self.playback.lock().await;
        let current = playback.playing().ok_or(MusicError::NotPlaying)?;
        current.player().resume();
        Ok(())
    }

    /// Set the volume of the current track as a percentage. Returns the applied gain.
    pub async fn set_volume(&self, percent: u32) -> MusicResult<f32> {
        let playback = self.playback.lock().await;
        let current = playback.playing().ok_or(MusicError::NotPlaying)?;
        let gain = percent as f32 / 100.0;
        current.player().set_volume(gain);
        debug!("Set volume to {} in guild {}", gain, self.guild_id);
        Ok(gain)
    }

    /// The current entry with its vote tally, or `None` when nothing is playing
    pub async fn playing_status(&self) -> Option<NowPlaying> {
        let playback = self.playback.lock().await;
        let entry = playback.playing().cloned()?;
        Some(NowPlaying {
            entry,
            skip_votes: playback.skip_votes.len(),
            queued: playback.queue.len(),
        })
    }

    pub async fn is_connected(&self) -> bool {
        self.voice.lock().await.connection.is_some()
    }

    /// Join `channel_id`. Fails if this guild already has a voice connection.
    pub async fn connect(
        &self,
        transport: &dyn VoiceTransport,
        channel_id: ChannelId,
    ) -> MusicResult<()> {
        let mut voice = self.voice.lock().await;
        if voice.closed {
            return Err(MusicError::Stopped);
        }
        if voice.connection.is_some() {
            return Err(MusicError::AlreadyConnected);
        }
        voice.connection = Some(transport.join(self.guild_id, channel_id).await?);
        Ok(())
    }

    /// Join `channel_id`, or move the existing connection there.
    pub async fn summon(
        &self,
        transport: &dyn VoiceTransport,
        channel_id: ChannelId,
    ) -> MusicResult<()> {
        let mut voice = self.voice.lock().await;
        if voice.closed {
            return Err(MusicError::Stopped);
        }
        match voice.connection.as_ref() {
            Some(connection) => connection.move_to(channel_id).await,
            None => {
                voice.connection = Some(transport.join(self.guild_id, channel_id).await?);
                Ok(())
            }
        }
    }

    /// Cancel the playback loop, stop the current track, drop the queue and
    /// release the voice connection.
    ///
    /// The state is closed afterwards: enqueue, connect and summon fail with
    /// [`MusicError::Stopped`]. Only a failed disconnect is reported.
    pub async fn shutdown(&self) -> MusicResult<()> {
        let task = self
            .loop_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Playback loop for guild {} panicked: {}", self.guild_id, e);
                }
            }
        }

        let (current, dropped) = {
            let mut playback = self.playback.lock().await;
            playback.closed = true;
            playback.skip_votes.clear();
            (
                playback.current.take(),
                std::mem::take(&mut playback.queue),
            )
        };

        if let Some(entry) = current {
            entry.player().stop();
        }
        if !dropped.is_empty() {
            debug!(
                "Dropped {} queued entries for guild {}",
                dropped.len(),
                self.guild_id
            );
        }

        let connection = {
            let mut voice = self.voice.lock().await;
            voice.closed = true;
            voice.connection.take()
        };
        match connection {
            Some(connection) => connection.disconnect().await,
            None => Ok(()),
        }
    }
}
