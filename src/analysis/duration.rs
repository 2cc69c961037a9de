//! Duration sweet-spot analysis over long-form videos

use super::stats::{average, median, total};
use crate::models::VideoRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum bucket population before it can be flagged as the best bucket
pub const MIN_BEST_BUCKET_COUNT: usize = 3;

/// Bucket bounds in seconds, `(min, max]`. `None` means unbounded.
///
/// The first bucket stores `min = 60` with an exclusive bound, so it starts at 61 seconds
/// and serializes `minSeconds: 60` rather than 61.
pub const DURATION_RANGES: [(&str, u64, Option<u64>); 7] = [
    ("Under 5 min", 60, Some(300)),
    ("5-10 min", 300, Some(600)),
    ("10-15 min", 600, Some(900)),
    ("15-20 min", 900, Some(1200)),
    ("20-30 min", 1200, Some(1800)),
    ("30-60 min", 1800, Some(3600)),
    ("60+ min", 3600, None),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DurationBucket {
    pub label: String,
    /// Exclusive lower bound
    pub min_seconds: u64,
    /// Inclusive upper bound, absent for the open-ended bucket
    pub max_seconds: Option<u64>,
    pub count: usize,
    pub avg_views: u64,
    pub median_views: u64,
    pub total_views: u64,
    pub is_best: bool,
}

impl DurationBucket {
    pub fn contains(&self, duration_seconds: u64) -> bool {
        duration_seconds > self.min_seconds && self.max_seconds.map_or(true, |max| duration_seconds <= max)
    }
}

/// Bucket long-form videos by duration and flag the best-performing bucket.
///
/// Videos of 60 seconds or less match no bucket and are silently left out.
pub fn analyze_duration(long_form: &[VideoRecord]) -> Vec<DurationBucket> {
    let mut buckets: Vec<DurationBucket> = DURATION_RANGES
        .iter()
        .map(|(label, min_seconds, max_seconds)| {
            let mut bucket = DurationBucket {
                label: label.to_string(),
                min_seconds: *min_seconds,
                max_seconds: *max_seconds,
                count: 0,
                avg_views: 0,
                median_views: 0,
                total_views: 0,
                is_best: false,
            };

            let views: Vec<u64> = long_form
                .iter()
                .filter(|v| bucket.contains(v.duration_seconds))
                .map(|v| v.view_count)
                .collect();

            bucket.count = views.len();
            bucket.avg_views = average(&views);
            bucket.median_views = median(&views);
            bucket.total_views = total(&views);
            bucket
        })
        .collect();

    // Strictly greater keeps the earliest bucket on ties
    let best = buckets
        .iter()
        .enumerate()
        .filter(|(_, b)| b.count >= MIN_BEST_BUCKET_COUNT)
        .fold(None::<(usize, u64)>, |best, (i, b)| match best {
            Some((_, top)) if top >= b.median_views => best,
            _ => Some((i, b.median_views)),
        });

    if let Some((idx, _)) = best {
        buckets[idx].is_best = true;
        debug!("Best duration bucket: {}", buckets[idx].label);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn with_durations(pairs: &[(u64, u64)]) -> Vec<VideoRecord> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        pairs
            .iter()
            .enumerate()
            .map(|(i, (duration, views))| VideoRecord::new(format!("v{}", i), "t", at, *views, 0, 0, *duration))
            .collect()
    }

    #[test]
    fn test_each_long_form_duration_hits_one_bucket() {
        let buckets = analyze_duration(&[]);
        assert_eq!(buckets.len(), 7);

        for duration in [61, 299, 300, 301, 600, 601, 900, 1200, 1800, 3600, 3601, 20000] {
            let hits = buckets.iter().filter(|b| b.contains(duration)).count();
            assert_eq!(hits, 1, "duration {}", duration);
        }
        assert!(buckets.iter().all(|b| !b.contains(60)));
    }

    #[test]
    fn test_bucket_aggregates() {
        let videos = with_durations(&[(120, 100), (200, 300), (300, 200), (400, 50), (7200, 9)]);
        let buckets = analyze_duration(&videos);

        let under_five = &buckets[0];
        assert_eq!(under_five.count, 3);
        assert_eq!(under_five.total_views, 600);
        assert_eq!(under_five.avg_views, 200);
        assert_eq!(under_five.median_views, 200);
        assert!(under_five.is_best);

        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[6].count, 1);
        assert_eq!(buckets[6].max_seconds, None);
    }

    #[test]
    fn test_small_bucket_never_best() {
        // 60+ min has the highest median but only two videos
        let videos = with_durations(&[
            (120, 10),
            (130, 20),
            (140, 30),
            (4000, 100_000),
            (5000, 200_000),
        ]);
        let buckets = analyze_duration(&videos);

        assert!(!buckets[6].is_best);
        assert!(buckets[0].is_best);
        assert_eq!(buckets.iter().filter(|b| b.is_best).count(), 1);
    }

    #[test]
    fn test_no_best_without_eligible_bucket() {
        let videos = with_durations(&[(120, 10), (400, 20), (700, 30)]);
        assert!(analyze_duration(&videos).iter().all(|b| !b.is_best));
    }

    #[test]
    fn test_tie_goes_to_first_bucket() {
        let videos = with_durations(&[
            (100, 50),
            (110, 50),
            (120, 50),
            (400, 50),
            (410, 50),
            (420, 50),
        ]);
        let buckets = analyze_duration(&videos);
        assert!(buckets[0].is_best);
        assert!(!buckets[1].is_best);
    }

    #[test]
    fn test_short_durations_are_dropped() {
        let videos = with_durations(&[(30, 1000), (60, 1000)]);
        let buckets = analyze_duration(&videos);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 0);
    }

    #[test]
    fn test_first_bucket_floor() {
        let buckets = analyze_duration(&with_durations(&[(61, 500)]));
        assert_eq!(buckets[0].min_seconds, 60);
        assert!(!buckets[0].contains(60));
        assert!(buckets[0].contains(61));
        assert_eq!(buckets[0].count, 1);

        let json = serde_json::to_value(&buckets[0]).unwrap();
        assert_eq!(json["minSeconds"], 60);
        assert_eq!(json["maxSeconds"], 300);
    }
}
