//! Channel acquisition
//!
//! Resolves user input to a channel and pulls the complete upload catalog. The analytics
//! core never calls into this module; it only receives what these sources return.

pub mod client;
pub mod snapshot;

pub use client::YouTubeClient;
pub use snapshot::CatalogSnapshot;

use crate::models::{ChannelMetadata, VideoRecord};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Result type for acquisition operations
pub type Result<T> = std::result::Result<T, YouTubeError>;

/// Error types for channel acquisition
#[derive(thiserror::Error, Debug)]
pub enum YouTubeError {
    #[error("Channel not found: {0}")]
    NotFound(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid channel input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Source of channel metadata and upload catalogs
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// Resolve a URL, handle, channel id or free-text name to a channel
    async fn resolve_channel(&self, input: &str) -> Result<ChannelMetadata>;

    /// Fetch every upload of a channel, sorted by view count, highest first
    async fn fetch_all_videos(&self, channel_id: &str) -> Result<Vec<VideoRecord>>;
}

/// What a piece of user input refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelInput {
    /// A `UC...` channel id
    ChannelId(String),
    /// A handle, without the leading `@`
    Handle(String),
    /// Anything else: a legacy custom name or a search query
    Query(String),
}

static CHANNEL_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)youtube\.com/(?:@([\w.-]+)|channel/(UC[\w-]+)|c/([\w.-]+)|user/([\w.-]+))")
        .expect("Invalid channel URL regex")
});

static ISO8601_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("Invalid duration regex")
});

impl ChannelInput {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(YouTubeError::InvalidInput("channel URL or handle required".to_string()));
        }

        let identifier = match CHANNEL_URL_REGEX.captures(trimmed) {
            Some(caps) => {
                if let Some(handle) = caps.get(1) {
                    format!("@{}", handle.as_str())
                } else {
                    (2..=4)
                        .find_map(|i| caps.get(i))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_else(|| trimmed.to_string())
                }
            }
            None => trimmed.to_string(),
        };

        if identifier.starts_with("UC") && identifier.len() == 24 {
            Ok(ChannelInput::ChannelId(identifier))
        } else if let Some(handle) = identifier.strip_prefix('@') {
            Ok(ChannelInput::Handle(handle.to_string()))
        } else {
            Ok(ChannelInput::Query(identifier))
        }
    }
}

/// Parse an ISO-8601 duration such as `PT1H2M3S` into seconds. Malformed input gives 0.
pub fn parse_iso8601_duration(iso: &str) -> u64 {
    let Some(caps) = ISO8601_DURATION_REGEX.captures(iso.trim()) else {
        return 0;
    };

    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    part(1) * 86_400 + part(2) * 3600 + part(3) * 60 + part(4)
}

/// The auto-generated playlist holding every upload of a channel
pub fn uploads_playlist_id(channel_id: &str) -> String {
    match channel_id.strip_prefix("UC") {
        Some(rest) => format!("UU{}", rest),
        None => channel_id.to_string(),
    }
}
