use super::stats::{average, median, total};
use crate::models::VideoRecord;
use serde::{Deserialize, Serialize};

/// View statistics for one side of the Shorts / long-form split
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatStats {
    pub count: usize,
    pub median_views: u64,
    pub avg_views: u64,
    pub total_views: u64,
}

impl FormatStats {
    fn from_videos<'a>(videos: impl Iterator<Item = &'a VideoRecord>) -> Self {
        let views: Vec<u64> = videos.map(|v| v.view_count).collect();
        Self {
            count: views.len(),
            median_views: median(&views),
            avg_views: average(&views),
            total_views: total(&views),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatSplit {
    pub shorts: FormatStats,
    pub long_form: FormatStats,
}

/// Compare Shorts against long-form across the full catalog
pub fn analyze_format_split(videos: &[VideoRecord]) -> FormatSplit {
    FormatSplit {
        shorts: FormatStats::from_videos(videos.iter().filter(|v| v.is_short)),
        long_form: FormatStats::from_videos(videos.iter().filter(|v| !v.is_short)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_split_counts_cover_every_video() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let videos = vec![
            VideoRecord::new("a", "short", at, 5000, 0, 0, 30),
            VideoRecord::new("b", "short", at, 1000, 0, 0, 59),
            VideoRecord::new("c", "long", at, 300, 0, 0, 900),
            VideoRecord::new("d", "live", at, 10, 0, 0, 0),
        ];

        let split = analyze_format_split(&videos);
        assert_eq!(split.shorts.count + split.long_form.count, videos.len());
        assert_eq!(split.shorts.count, 2);
        assert_eq!(split.shorts.median_views, 3000);
        assert_eq!(split.shorts.total_views, 6000);
        assert_eq!(split.long_form.count, 2);
        assert_eq!(split.long_form.avg_views, 155);
    }

    #[test]
    fn test_empty_split() {
        assert_eq!(analyze_format_split(&[]), FormatSplit::default());
    }
}
