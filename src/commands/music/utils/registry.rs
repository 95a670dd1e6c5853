use dashmap::DashMap;
use futures::future::join_all;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tracing::{info, warn};

use super::music_manager::MusicResult;
use super::notifier::NotificationSink;
use super::voice_state::GuildVoiceState;

/// Owns the voice state of every guild with playback since its last stop.
pub struct VoiceRegistry {
    states: DashMap<GuildId, Arc<GuildVoiceState>>,
    notifier: Arc<dyn NotificationSink>,
}

impl VoiceRegistry {
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            states: DashMap::new(),
            notifier,
        }
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<GuildVoiceState>> {
        self.states.get(&guild_id).map(|state| Arc::clone(state.value()))
    }

    /// Get the state for `guild_id`, creating it and starting its playback loop if needed.
    ///
    /// Creation happens under the map's entry lock, so concurrent callers for
    /// the same guild always share one state.
    pub fn get_or_create(&self, guild_id: GuildId) -> Arc<GuildVoiceState> {
        self.states
            .entry(guild_id)
            .or_insert_with(|| {
                let state = GuildVoiceState::new(guild_id, Arc::clone(&self.notifier));
                state.start();
                state
            })
            .value()
            .clone()
    }

    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<GuildVoiceState>> {
        self.states.remove(&guild_id).map(|(_, state)| state)
    }

    // Diagnostics: commands only go through `get`, `get_or_create` and `stop`.

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.states.contains_key(&guild_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Remove the guild's state and shut it down.
    ///
    /// The state leaves the registry even when releasing its voice connection fails.
    pub async fn stop(&self, guild_id: GuildId) -> MusicResult<()> {
        match self.remove(guild_id) {
            Some(state) => {
                info!("Stopping playback for guild {}", guild_id);
                state.shutdown().await
            }
            None => Ok(()),
        }
    }

    /// Shut down every guild. A guild that fails to disconnect is logged and
    /// does not keep the others from being released. Returns how many guilds
    /// were torn down.
    pub async fn shutdown_all(&self) -> usize {
        let guild_ids: Vec<GuildId> = self.states.iter().map(|entry| *entry.key()).collect();
        let states: Vec<Arc<GuildVoiceState>> = guild_ids
            .into_iter()
            .filter_map(|guild_id| self.remove(guild_id))
            .collect();

        let results = join_all(states.iter().map(|state| async move {
            (state.guild_id(), state.shutdown().await)
        }))
        .await;

        for (guild_id, result) in &results {
            if let Err(e) = result {
                warn!(
                    "Failed to release voice connection for guild {} during shutdown: {}",
                    guild_id, e
                );
            }
        }

        info!("Shut down playback for {} guilds", results.len());
        results.len()
    }
}
