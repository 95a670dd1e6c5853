use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use crate::Error;

/// Best-effort delivery of playback announcements to a text channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn announce(&self, channel_id: ChannelId, text: String) -> Result<(), Error>;
}

/// Posts announcements as plain messages through the Discord HTTP API.
pub struct ChannelNotifier {
    http: Arc<Http>,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl NotificationSink for ChannelNotifier {
    async fn announce(&self, channel_id: ChannelId, text: String) -> Result<(), Error> {
        channel_id.say(&*self.http, text).await?;
        Ok(())
    }
}
