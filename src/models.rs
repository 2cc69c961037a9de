//! Channel and video records handed to the analytics core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Videos at or under this duration (and longer than zero) are Shorts
pub const SHORT_MAX_SECONDS: u64 = 60;

/// A single uploaded video with its public statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Platform video identifier
    pub video_id: String,

    /// Video title as published
    pub title: String,

    /// Publish timestamp
    pub published_at: DateTime<Utc>,

    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,

    /// Duration in whole seconds (0 when unknown)
    pub duration_seconds: u64,

    /// True iff `0 < duration_seconds <= 60`
    pub is_short: bool,

    /// Best available thumbnail URL
    #[serde(default)]
    pub thumbnail: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Description, truncated by the acquisition layer
    #[serde(default)]
    pub description: String,
}

impl VideoRecord {
    /// Create a video record, deriving the Shorts flag from its duration
    pub fn new(
        video_id: impl Into<String>,
        title: impl Into<String>,
        published_at: DateTime<Utc>,
        view_count: u64,
        like_count: u64,
        comment_count: u64,
        duration_seconds: u64,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            published_at,
            view_count,
            like_count,
            comment_count,
            duration_seconds,
            is_short: is_short_duration(duration_seconds),
            thumbnail: String::new(),
            tags: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Shorts classification rule shared by acquisition and analysis
pub fn is_short_duration(duration_seconds: u64) -> bool {
    duration_seconds > 0 && duration_seconds <= SHORT_MAX_SECONDS
}

/// Channel-level metadata, passed through the report untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetadata {
    pub channel_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_short_flag_derived_from_duration() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert!(VideoRecord::new("a", "clip", at, 1, 0, 0, 60).is_short);
        assert!(VideoRecord::new("b", "clip", at, 1, 0, 0, 1).is_short);
        assert!(!VideoRecord::new("c", "talk", at, 1, 0, 0, 61).is_short);
        // Unknown duration is not a Short
        assert!(!VideoRecord::new("d", "live", at, 1, 0, 0, 0).is_short);
    }

    #[test]
    fn test_video_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let video = VideoRecord::new("abc", "Title", at, 10, 2, 1, 300);
        let json = serde_json::to_value(&video).unwrap();

        assert_eq!(json["videoId"], "abc");
        assert_eq!(json["viewCount"], 10);
        assert_eq!(json["durationSeconds"], 300);
        assert_eq!(json["isShort"], false);
    }
}
