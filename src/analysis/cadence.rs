//! Upload cadence: yearly and monthly breakdowns plus upload velocity
//!
//! Calendar fields are taken in UTC. The monthly window is anchored on the data,
//! never on the wall clock, so repeated runs over the same catalog agree.

use super::stats::{average, median, round_to_tenths, total};
use crate::models::VideoRecord;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of most recent active months reported
pub const RECENT_MONTHS: usize = 12;

/// Fixed average weeks per month used for the monthly rate
pub const WEEKS_PER_MONTH: f64 = 4.33;

const MS_PER_WEEK: f64 = 7.0 * 24.0 * 3600.0 * 1000.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyUpload {
    pub year: i32,
    pub count: usize,
    pub avg_views: u64,
    pub median_views: u64,
    pub total_views: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUpload {
    /// Zero-padded `YYYY-MM`
    pub month: String,
    pub count: usize,
    pub avg_views: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadCadence {
    pub yearly: Vec<YearlyUpload>,
    /// Up to twelve most recent months that have at least one upload, oldest first
    pub monthly: Vec<MonthlyUpload>,
    pub avg_uploads_per_month: f64,
    pub avg_uploads_per_week: f64,
}

pub fn month_key(video: &VideoRecord) -> String {
    format!("{:04}-{:02}", video.published_at.year(), video.published_at.month())
}

pub fn analyze_upload_cadence(videos: &[VideoRecord]) -> UploadCadence {
    let mut by_year: BTreeMap<i32, Vec<u64>> = BTreeMap::new();
    let mut by_month: BTreeMap<String, Vec<u64>> = BTreeMap::new();

    for video in videos {
        by_year
            .entry(video.published_at.year())
            .or_default()
            .push(video.view_count);
        by_month.entry(month_key(video)).or_default().push(video.view_count);
    }

    let yearly = by_year
        .into_iter()
        .map(|(year, views)| YearlyUpload {
            year,
            count: views.len(),
            avg_views: average(&views),
            median_views: median(&views),
            total_views: total(&views),
        })
        .collect();

    let skip = by_month.len().saturating_sub(RECENT_MONTHS);
    let monthly = by_month
        .into_iter()
        .skip(skip)
        .map(|(month, views)| MonthlyUpload {
            month,
            count: views.len(),
            avg_views: average(&views),
        })
        .collect();

    let (avg_uploads_per_month, avg_uploads_per_week) = upload_rates(videos);

    UploadCadence {
        yearly,
        monthly,
        avg_uploads_per_month,
        avg_uploads_per_week,
    }
}

/// Uploads per month and per week over the span between first and last upload
fn upload_rates(videos: &[VideoRecord]) -> (f64, f64) {
    if videos.len() < 2 {
        return (0.0, 0.0);
    }

    let stamps = videos.iter().map(|v| v.published_at.timestamp_millis());
    let (first, last) = stamps.fold((i64::MAX, i64::MIN), |(lo, hi), t| (lo.min(t), hi.max(t)));

    let span_weeks = (last - first) as f64 / MS_PER_WEEK;
    let span_months = span_weeks / WEEKS_PER_MONTH;
    let count = videos.len() as f64;

    let per_month = if span_months > 0.0 { round_to_tenths(count / span_months) } else { 0.0 };
    let per_week = if span_weeks > 0.0 { round_to_tenths(count / span_weeks) } else { 0.0 };
    (per_month, per_week)
}
