//! Voice channel connections.

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::Songbird;
use std::sync::Arc;
use tracing::{error, info};

use super::music_manager::{MusicError, MusicResult};

/// Establishes voice connections for a guild.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    async fn join(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Box<dyn VoiceConnection>>;
}

/// An active voice session in one guild.
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    /// Move the existing session to another channel of the same guild.
    async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()>;

    async fn disconnect(&self) -> MusicResult<()>;
}

/// Voice transport backed by the songbird manager registered with the client.
pub struct SongbirdTransport {
    manager: Arc<Songbird>,
}

impl SongbirdTransport {
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn join(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Box<dyn VoiceConnection>> {
        // Songbird keeps one call per guild; joining while it exists would silently move it
        if self.manager.get(guild_id).is_some() {
            return Err(MusicError::AlreadyConnected);
        }

        if let Err(err) = self.manager.join(guild_id, channel_id).await {
            error!(
                "Failed to join voice channel {} for guild {}: {}",
                channel_id, guild_id, err
            );
            return Err(MusicError::JoinError(err.to_string()));
        }

        info!("Joined voice channel {} in guild {}", channel_id, guild_id);

        Ok(Box::new(SongbirdConnection {
            manager: Arc::clone(&self.manager),
            guild_id,
        }))
    }
}

struct SongbirdConnection {
    manager: Arc<Songbird>,
    guild_id: GuildId,
}

#[async_trait]
impl VoiceConnection for SongbirdConnection {
    async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()> {
        self.manager
            .join(self.guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;

        info!(
            "Moved to voice channel {} in guild {}",
            channel_id, self.guild_id
        );
        Ok(())
    }

    async fn disconnect(&self) -> MusicResult<()> {
        if self.manager.get(self.guild_id).is_none() {
            return Err(MusicError::NotConnected);
        }

        self.manager
            .remove(self.guild_id)
            .await
            .map_err(|e| MusicError::LeaveError(e.to_string()))?;

        info!("Left voice channel in guild {}", self.guild_id);
        Ok(())
    }
}
