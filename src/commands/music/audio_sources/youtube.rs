//! Implements the `SongResolver` trait with the `yt-dlp` command-line tool.
//! Any site `yt-dlp` supports can be played, and plain text is searched for.

use reqwest::Client;
use serenity::async_trait;
use serenity::model::id::GuildId;
use songbird::Songbird;
use songbird::input::YoutubeDl;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

use super::{AudioSource, ResolveError, ResolveOptions, ResolvedSong, SongResolver, TrackMetadata};
use crate::commands::music::utils::player::{CompletionHook, SongbirdPlayer};

/// Resolves queries through `yt-dlp` and streams them with songbird.
pub struct YtDlpResolver {
    manager: Arc<Songbird>,
    http: Client,
}

impl YtDlpResolver {
    pub fn new(manager: Arc<Songbird>, http: Client) -> Self {
        Self { manager, http }
    }

    /// Arguments passed to `yt-dlp` to fetch metadata for `query`
    fn metadata_args(query: &str, options: &ResolveOptions) -> Vec<String> {
        let mut args = vec!["-j".to_string(), "--no-playlist".to_string()];

        if options.quiet {
            args.extend(["--quiet".to_string(), "--no-warnings".to_string()]);
        }

        if options.auto_search {
            args.extend(["--default-search".to_string(), "auto".to_string()]);
        }

        // Keep queries starting with '-' from being read as flags
        args.push("--".to_string());
        args.push(query.to_string());
        args
    }

    fn check_query(query: &str, options: &ResolveOptions) -> Result<(), ResolveError> {
        if query.is_empty() {
            return Err(ResolveError::UnsupportedQuery(
                "Nothing to search for".to_string(),
            ));
        }

        if !options.auto_search && !AudioSource::is_url(query) {
            return Err(ResolveError::UnsupportedQuery(format!(
                "'{}' is not a URL and searching is disabled",
                query
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl SongResolver for YtDlpResolver {
    async fn resolve(
        &self,
        guild_id: GuildId,
        query: &str,
        options: &ResolveOptions,
        on_complete: CompletionHook,
    ) -> Result<ResolvedSong, ResolveError> {
        let query = query.trim();
        Self::check_query(query, options)?;

        info!("Resolving '{}' for guild {}", query, guild_id);

        let output = Command::new("yt-dlp")
            .args(Self::metadata_args(query, options))
            .output()
            .await
            .map_err(|e| ResolveError::Process(format!("Failed to run yt-dlp: {}", e)))?;

        let metadata = TrackMetadata::try_from(output)?;
        debug!("Resolved metadata for guild {}: {:?}", guild_id, metadata);

        let url = metadata.url.clone().ok_or_else(|| {
            ResolveError::Metadata(format!("No playable URL for '{}'", metadata.title))
        })?;

        let input = YoutubeDl::new(self.http.clone(), url).into();
        let player = SongbirdPlayer::new(Arc::clone(&self.manager), guild_id, input, on_complete);

        Ok(ResolvedSong {
            player: Arc::new(player),
            metadata,
        })
    }
}
