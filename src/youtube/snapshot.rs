/// File-backed channel catalog for offline audits and fixtures
use super::{ChannelInput, ChannelSource, Result, YouTubeError};
use crate::models::{ChannelMetadata, VideoRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A channel and its full upload list, as previously fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub channel: ChannelMetadata,
    pub videos: Vec<VideoRecord>,
}

impl CatalogSnapshot {
    pub fn new(channel: ChannelMetadata, videos: Vec<VideoRecord>) -> Self {
        Self { channel, videos }
    }

    /// Load a snapshot from a JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&content)?;
        info!(
            "📄 Loaded snapshot for {} ({} videos) from {}",
            snapshot.channel.title,
            snapshot.videos.len(),
            path.as_ref().display()
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty JSON
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path.as_ref(), json).await?;
        info!("💾 Snapshot saved to: {}", path.as_ref().display());
        Ok(())
    }

    fn handle(&self) -> Option<&str> {
        self.channel
            .custom_url
            .as_deref()
            .map(|url| url.trim_start_matches('@'))
    }

    fn is_match(&self, input: &ChannelInput) -> bool {
        match input {
            ChannelInput::ChannelId(id) => *id == self.channel.channel_id,
            ChannelInput::Handle(handle) => self.handle().is_some_and(|h| h.eq_ignore_ascii_case(handle)),
            ChannelInput::Query(query) => {
                self.channel.title.eq_ignore_ascii_case(query)
                    || self.handle().is_some_and(|h| h.eq_ignore_ascii_case(query))
            }
        }
    }
}

#[async_trait]
impl ChannelSource for CatalogSnapshot {
    async fn resolve_channel(&self, input: &str) -> Result<ChannelMetadata> {
        let parsed = ChannelInput::parse(input)?;
        if self.is_match(&parsed) {
            Ok(self.channel.clone())
        } else {
            Err(YouTubeError::NotFound(input.trim().to_string()))
        }
    }

    async fn fetch_all_videos(&self, channel_id: &str) -> Result<Vec<VideoRecord>> {
        if channel_id != self.channel.channel_id {
            return Err(YouTubeError::NotFound(channel_id.to_string()));
        }
        let mut videos = self.videos.clone();
        videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        Ok(videos)
    }
}
