//! Song resolution: turning a search string or URL into a player handle plus
//! display metadata.

/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub mod track_metadata;
/// Submodule implementing the `SongResolver` trait on top of `yt-dlp`.
pub mod youtube;

use serenity::async_trait;
use serenity::model::id::GuildId;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::commands::music::utils::player::{CompletionHook, PlayerHandle};

pub use track_metadata::TrackMetadata;

/// Why a query could not be turned into a playable track
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0}")]
    UnsupportedQuery(String),

    #[error("{0}")]
    Process(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Metadata(String),
}

impl ResolveError {
    /// Stable name of the failure kind, shown next to the message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedQuery(_) => "UnsupportedQuery",
            Self::Process(_) => "ProcessError",
            Self::Extraction(_) => "ExtractionError",
            Self::Metadata(_) => "MetadataError",
        }
    }
}

/// Options forwarded to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Treat anything that is not a URL as a search query
    pub auto_search: bool,
    /// Suppress the extractor's own progress and warning output
    pub quiet: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            auto_search: true,
            quiet: true,
        }
    }
}

/// A playable track that has not been queued yet.
pub struct ResolvedSong {
    pub player: Arc<dyn PlayerHandle>,
    pub metadata: TrackMetadata,
}

/// Trait defining how queries become playable tracks.
/// Requires `Send + Sync` to be safely used across async tasks.
#[async_trait]
pub trait SongResolver: Send + Sync {
    /// Resolve `query` for `guild_id`.
    ///
    /// The returned player notifies `on_complete` when its playback ends.
    async fn resolve(
        &self,
        guild_id: GuildId,
        query: &str,
        options: &ResolveOptions,
        on_complete: CompletionHook,
    ) -> Result<ResolvedSong, ResolveError>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as a URL.
    /// Does not validate if the URL is actually reachable or supported.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok_and(|url| url.has_host())
    }
}
