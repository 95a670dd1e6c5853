//! Defines the `TrackMetadata` struct, the display information carried by a
//! queued track, and its conversion from `yt-dlp` output.

use std::process::Output;
use std::time::Duration;

use super::ResolveError;

/// Display metadata for a playable track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The channel or account that published the track, if known.
    pub uploader: Option<String>,
    /// The page the track was resolved from, if available.
    pub url: Option<String>,
    /// The duration of the track; absent for live streams.
    pub duration: Option<Duration>,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Track".to_string(),
            uploader: None,
            url: None,
            duration: None,
        }
    }
}

impl TrackMetadata {
    /// Parse the first JSON document printed by `yt-dlp -j`.
    pub fn from_ytdlp_json(raw: &str) -> Result<Self, ResolveError> {
        let line = raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| ResolveError::Metadata("No results found".to_string()))?;

        let metadata_json: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            ResolveError::Metadata(format!("Failed to parse video metadata: {}", e))
        })?;

        let title = metadata_json["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        let uploader = metadata_json["uploader"]
            .as_str()
            .or_else(|| metadata_json["channel"].as_str())
            .map(|s| s.to_string());

        let url = metadata_json["webpage_url"]
            .as_str()
            .or_else(|| metadata_json["url"].as_str())
            .map(|s| s.to_string());

        // Live streams report no duration (or zero)
        let duration = metadata_json["duration"]
            .as_f64()
            .filter(|secs| *secs > 0.0)
            .map(Duration::from_secs_f64);

        Ok(Self {
            title,
            uploader,
            url,
            duration,
        })
    }
}

/// Converts the output of `yt-dlp --dump-json` into `TrackMetadata`.
impl TryFrom<Output> for TrackMetadata {
    type Error = ResolveError;

    fn try_from(value: Output) -> Result<Self, Self::Error> {
        if !value.status.success() {
            let stderr = String::from_utf8_lossy(&value.stderr);
            let message = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("yt-dlp exited with an error")
                .trim()
                .to_string();
            return Err(ResolveError::Extraction(message));
        }

        Self::from_ytdlp_json(&String::from_utf8_lossy(&value.stdout))
    }
}
