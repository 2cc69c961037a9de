//! Performance tiers relative to the channel's median long-form views

use super::stats::{average, round_half_up};
use crate::models::VideoRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Static definition of one tier
#[derive(Debug, Clone, Copy)]
pub struct TierDefinition {
    pub label: &'static str,
    /// Lower bound as a multiple of the median
    pub multiplier: f64,
    /// Presentation colour tag
    pub color: &'static str,
}

/// Tiers ordered from the highest threshold down. The last tier has no lower bound.
pub const TIER_DEFINITIONS: [TierDefinition; 6] = [
    TierDefinition { label: "Viral", multiplier: 10.0, color: "#10b981" },
    TierDefinition { label: "Strong", multiplier: 5.0, color: "#34d399" },
    TierDefinition { label: "Above Average", multiplier: 2.0, color: "#6ee7b7" },
    TierDefinition { label: "Average", multiplier: 0.5, color: "#94a3b8" },
    TierDefinition { label: "Below Average", multiplier: 0.2, color: "#f87171" },
    TierDefinition { label: "Poor", multiplier: 0.0, color: "#ef4444" },
];

/// A bucket of long-form videos within a view-count range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTier {
    pub label: String,
    /// Inclusive lower bound on views
    pub threshold: u64,
    pub color: String,
    pub count: usize,
    /// Share of all long-form videos, rounded
    pub percentage: u64,
    pub avg_views: u64,
    pub videos: Vec<VideoRecord>,
}

/// Partition `long_form` into the six tiers.
///
/// Tier `i` holds views in `[round(median * m[i]), round(median * m[i - 1]))`; the top tier
/// is unbounded above and the bottom tier unbounded below.
pub fn calculate_performance_tiers(long_form: &[VideoRecord], median_views: u64) -> Vec<PerformanceTier> {
    let total = long_form.len();
    let thresholds: Vec<u64> = TIER_DEFINITIONS
        .iter()
        .map(|tier| round_half_up(median_views as f64 * tier.multiplier))
        .collect();
    let last = TIER_DEFINITIONS.len() - 1;

    let tiers: Vec<PerformanceTier> = TIER_DEFINITIONS
        .iter()
        .enumerate()
        .map(|(i, tier)| {
            let threshold = thresholds[i];
            let upper = if i == 0 { None } else { Some(thresholds[i - 1]) };

            let videos: Vec<VideoRecord> = long_form
                .iter()
                .filter(|v| match upper {
                    None => v.view_count >= threshold,
                    Some(upper) if i == last => v.view_count < upper,
                    Some(upper) => v.view_count >= threshold && v.view_count < upper,
                })
                .cloned()
                .collect();

            let views: Vec<u64> = videos.iter().map(|v| v.view_count).collect();
            let percentage = if total > 0 {
                round_half_up(videos.len() as f64 / total as f64 * 100.0)
            } else {
                0
            };

            PerformanceTier {
                label: tier.label.to_string(),
                threshold,
                color: tier.color.to_string(),
                count: videos.len(),
                percentage,
                avg_views: average(&views),
                videos,
            }
        })
        .collect();

    debug!(
        "Tier counts for median {}: {:?}",
        median_views,
        tiers.iter().map(|t| t.count).collect::<Vec<_>>()
    );

    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn long_form(views: &[u64]) -> Vec<VideoRecord> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        views
            .iter()
            .enumerate()
            .map(|(i, v)| VideoRecord::new(format!("v{}", i), format!("Video {}", i), at, *v, 0, 0, 600))
            .collect()
    }

    #[test]
    fn test_thresholds_scale_off_median() {
        let videos = long_form(&[100, 200, 300, 400, 10000]);
        let tiers = calculate_performance_tiers(&videos, 300);

        let thresholds: Vec<u64> = tiers.iter().map(|t| t.threshold).collect();
        assert_eq!(thresholds, vec![3000, 1500, 600, 150, 60, 0]);

        let counts: Vec<usize> = tiers.iter().map(|t| t.count).collect();
        // 10000 viral; 200, 300, 400 average; 100 below average
        assert_eq!(counts, vec![1, 0, 0, 3, 1, 0]);
        assert_eq!(tiers.iter().map(|t| t.percentage).sum::<u64>(), 100);
        assert_eq!(tiers[0].videos[0].view_count, 10000);
        assert_eq!(tiers[3].avg_views, 300);
    }

    #[test]
    fn test_every_video_lands_in_exactly_one_tier() {
        let views = [1, 59, 60, 149, 150, 599, 600, 1500, 3000, 50000];
        let videos = long_form(&views);
        let tiers = calculate_performance_tiers(&videos, 300);

        assert_eq!(tiers.iter().map(|t| t.count).sum::<usize>(), videos.len());
        for video in &videos {
            let homes = tiers
                .iter()
                .filter(|t| t.videos.iter().any(|v| v.video_id == video.video_id))
                .count();
            assert_eq!(homes, 1, "video with {} views", video.view_count);
        }

        let pct: u64 = tiers.iter().map(|t| t.percentage).sum();
        assert!((99..=101).contains(&pct));
    }

    #[test]
    fn test_empty_input_gives_zeroed_tiers() {
        let tiers = calculate_performance_tiers(&[], 0);
        assert_eq!(tiers.len(), 6);
        assert!(tiers.iter().all(|t| t.count == 0 && t.percentage == 0 && t.avg_views == 0));
    }

    #[test]
    fn test_zero_median_collapses_into_top_tier() {
        let videos = long_form(&[0, 0, 5]);
        let tiers = calculate_performance_tiers(&videos, 0);

        assert_eq!(tiers[0].label, "Viral");
        assert_eq!(tiers[0].count, 3);
        assert!(tiers[1..].iter().all(|t| t.count == 0));
    }
}
