/// Channel analytics engine
///
/// Turns a fully materialised video catalog into a [`ChannelAnalysis`]. Every function in
/// this module tree is pure and synchronous; the same input always yields the same report.

pub mod stats;
pub mod tiers;
pub mod title_patterns;
pub mod duration;
pub mod format_split;
pub mod cadence;

pub use cadence::{analyze_upload_cadence, MonthlyUpload, UploadCadence, YearlyUpload};
pub use duration::{analyze_duration, DurationBucket};
pub use format_split::{analyze_format_split, FormatSplit, FormatStats};
pub use stats::{average, median, total};
pub use tiers::{calculate_performance_tiers, PerformanceTier};
pub use title_patterns::{analyze_title_patterns, PatternDirection, TitlePattern};

use crate::models::{ChannelMetadata, VideoRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of long-form videos listed as top performers
pub const TOP_VIDEO_COUNT: usize = 10;

/// Videos below this view count are ignored for engagement
pub const ENGAGEMENT_MIN_VIEWS: u64 = 500;

/// The complete audit report for one channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAnalysis {
    pub channel_info: ChannelMetadata,
    pub total_videos: usize,
    pub long_form_count: usize,
    pub shorts_count: usize,
    /// Median long-form views
    pub median_views: u64,
    /// Average long-form views
    pub avg_views: u64,
    pub performance_tiers: Vec<PerformanceTier>,
    pub top_videos: Vec<VideoRecord>,
    pub format_split: FormatSplit,
    pub title_patterns: Vec<TitlePattern>,
    pub duration_buckets: Vec<DurationBucket>,
    pub upload_cadence: UploadCadence,
    /// Mean like-to-view percentage, two decimals
    pub engagement_rate: f64,
}

impl ChannelAnalysis {
    pub fn best_duration_bucket(&self) -> Option<&DurationBucket> {
        self.duration_buckets.iter().find(|b| b.is_best)
    }

    /// Patterns with enough matches to trust, highest lift first
    pub fn reliable_patterns(&self) -> Vec<&TitlePattern> {
        let mut patterns: Vec<&TitlePattern> =
            self.title_patterns.iter().filter(|p| p.is_reliable()).collect();
        patterns.sort_by(|a, b| b.lift.cmp(&a.lift));
        patterns
    }
}

/// Split a catalog into `(long_form, shorts)`, preserving input order
pub fn segment_videos(videos: &[VideoRecord]) -> (Vec<VideoRecord>, Vec<VideoRecord>) {
    videos.iter().cloned().partition(|v| !v.is_short)
}

/// Mean of per-video like percentages over long-form videos above the noise floor
pub fn engagement_rate(long_form: &[VideoRecord]) -> f64 {
    let ratios: Vec<f64> = long_form
        .iter()
        .filter(|v| v.view_count >= ENGAGEMENT_MIN_VIEWS)
        .map(|v| v.like_count as f64 / v.view_count as f64 * 100.0)
        .collect();

    if ratios.is_empty() {
        return 0.0;
    }
    stats::round_to_hundredths(ratios.iter().sum::<f64>() / ratios.len() as f64)
}

/// Build the full report.
///
/// `videos` must already be sorted by view count, highest first: the top-video list is the
/// first ten long-form entries as given.
pub fn analyze_channel(videos: &[VideoRecord], channel_info: ChannelMetadata) -> ChannelAnalysis {
    let (long_form, shorts) = segment_videos(videos);

    let long_form_views: Vec<u64> = long_form.iter().map(|v| v.view_count).collect();
    let median_views = median(&long_form_views);
    let avg_views = average(&long_form_views);

    debug!(
        "Analyzing {}: {} long-form, {} shorts, median {}",
        channel_info.channel_id,
        long_form.len(),
        shorts.len(),
        median_views
    );

    ChannelAnalysis {
        total_videos: videos.len(),
        long_form_count: long_form.len(),
        shorts_count: shorts.len(),
        median_views,
        avg_views,
        performance_tiers: calculate_performance_tiers(&long_form, median_views),
        top_videos: long_form.iter().take(TOP_VIDEO_COUNT).cloned().collect(),
        format_split: analyze_format_split(videos),
        title_patterns: analyze_title_patterns(&long_form),
        duration_buckets: analyze_duration(&long_form),
        upload_cadence: analyze_upload_cadence(videos),
        engagement_rate: engagement_rate(&long_form),
        channel_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn video(id: &str, views: u64, likes: u64, duration: u64) -> VideoRecord {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        VideoRecord::new(id, id, at, views, likes, 0, duration)
    }

    #[test]
    fn test_engagement_rate_averages_ratios() {
        let videos = vec![
            video("a", 1000, 50, 600),  // 5%
            video("b", 2000, 20, 600),  // 1%
            video("c", 499, 499, 600),  // below floor
        ];
        assert_eq!(engagement_rate(&videos), 3.0);
        assert_eq!(engagement_rate(&[video("d", 10, 5, 600)]), 0.0);
    }

    #[test]
    fn test_engagement_rate_rounds_two_decimals() {
        let videos = vec![video("a", 3000, 100, 600)];
        assert_eq!(engagement_rate(&videos), 3.33);
    }

    #[test]
    fn test_segmentation_preserves_order() {
        let videos = vec![video("a", 9, 0, 30), video("b", 8, 0, 600), video("c", 7, 0, 700)];
        let (long_form, shorts) = segment_videos(&videos);
        assert_eq!(long_form.iter().map(|v| v.video_id.as_str()).collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(shorts.len(), 1);
    }

    #[test]
    fn test_empty_catalog() {
        let analysis = analyze_channel(&[], ChannelMetadata::default());
        assert_eq!(analysis.total_videos, 0);
        assert_eq!(analysis.median_views, 0);
        assert_eq!(analysis.engagement_rate, 0.0);
        assert_eq!(analysis.performance_tiers.len(), 6);
        assert_eq!(analysis.duration_buckets.len(), 7);
        assert_eq!(analysis.title_patterns.len(), 11);
        assert!(analysis.top_videos.is_empty());
        assert!(analysis.best_duration_bucket().is_none());
    }
}
