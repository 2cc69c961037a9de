//! Text renderings of a [`ChannelAnalysis`]: the recommendation prompt and the CLI summary

use crate::analysis::ChannelAnalysis;
use std::fmt::Write;

/// Title patterns listed in the prompt
const PROMPT_PATTERN_LIMIT: usize = 6;

/// Recent months listed in the prompt
const PROMPT_RECENT_MONTHS: usize = 6;

/// `1234567` -> `1,234,567`
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` -> `1.2M`, `12345` -> `12.3K`
pub fn compact_count(value: u64) -> String {
    match value {
        v if v >= 1_000_000_000 => format!("{:.1}B", v as f64 / 1_000_000_000.0),
        v if v >= 1_000_000 => format!("{:.1}M", v as f64 / 1_000_000.0),
        v if v >= 1_000 => format!("{:.1}K", v as f64 / 1_000.0),
        v => v.to_string(),
    }
}

/// Seconds as `m:ss`, or `h:mm:ss` past an hour
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

fn signed(lift: i64) -> String {
    if lift > 0 {
        format!("+{}", lift)
    } else {
        lift.to_string()
    }
}

/// Summarise the analysis as the user turn of the recommendation prompt
pub fn build_recommendation_prompt(analysis: &ChannelAnalysis) -> String {
    let channel = &analysis.channel_info;
    let mut out = String::new();

    let _ = writeln!(out, "## Channel: {}", channel.title);
    let _ = writeln!(out, "- Subscribers: {}", with_thousands(channel.subscriber_count));
    let _ = writeln!(out, "- Total videos: {}", analysis.total_videos);
    let _ = writeln!(out, "- Long-form: {}, Shorts: {}", analysis.long_form_count, analysis.shorts_count);
    let _ = writeln!(out, "- Median views (long-form): {}", with_thousands(analysis.median_views));
    let _ = writeln!(out, "- Average views (long-form): {}", with_thousands(analysis.avg_views));
    let _ = writeln!(out, "- Engagement rate: {}%", analysis.engagement_rate);

    let _ = writeln!(out, "\n## Performance Tiers");
    for tier in &analysis.performance_tiers {
        let _ = writeln!(
            out,
            "- {} ({}+ views): {} videos ({}%)",
            tier.label,
            with_thousands(tier.threshold),
            tier.count,
            tier.percentage
        );
    }

    let _ = writeln!(out, "\n## Top 10 Videos");
    for (i, video) in analysis.top_videos.iter().enumerate() {
        let _ = writeln!(out, "{}. \"{}\" - {} views", i + 1, video.title, with_thousands(video.view_count));
    }

    let split = &analysis.format_split;
    let _ = writeln!(out, "\n## Format Split");
    let _ = writeln!(
        out,
        "- Shorts: {} videos, median {} views",
        split.shorts.count,
        with_thousands(split.shorts.median_views)
    );
    let _ = writeln!(
        out,
        "- Long-form: {} videos, median {} views",
        split.long_form.count,
        with_thousands(split.long_form.median_views)
    );

    let _ = writeln!(out, "\n## Title Patterns (lift %)");
    for pattern in analysis.reliable_patterns().into_iter().take(PROMPT_PATTERN_LIMIT) {
        let _ = writeln!(out, "- {}: {}% ({} videos)", pattern.name, signed(pattern.lift), pattern.match_count);
    }

    let _ = writeln!(out, "\n## Duration Sweet Spot");
    match analysis.best_duration_bucket() {
        Some(best) => {
            let _ = writeln!(
                out,
                "Best: {} - median {} views ({} videos)",
                best.label,
                with_thousands(best.median_views),
                best.count
            );
        }
        None => {
            let _ = writeln!(out, "No clear sweet spot");
        }
    }
    for bucket in analysis.duration_buckets.iter().filter(|b| b.count >= 3) {
        let _ = writeln!(
            out,
            "- {}: median {} views ({} videos)",
            bucket.label,
            with_thousands(bucket.median_views),
            bucket.count
        );
    }

    let cadence = &analysis.upload_cadence;
    let recent: Vec<String> = cadence
        .monthly
        .iter()
        .skip(cadence.monthly.len().saturating_sub(PROMPT_RECENT_MONTHS))
        .map(|m| format!("{}: {} videos, avg {} views", m.month, m.count, with_thousands(m.avg_views)))
        .collect();
    let _ = writeln!(out, "\n## Upload Cadence");
    let _ = writeln!(out, "- Average: {} uploads/month", cadence.avg_uploads_per_month);
    let _ = writeln!(out, "- Recent 6 months: {}", recent.join("; "));

    let _ = writeln!(out, "\n## Yearly Trend");
    for year in &cadence.yearly {
        let _ = writeln!(
            out,
            "- {}: {} videos, median {} views",
            year.year,
            year.count,
            with_thousands(year.median_views)
        );
    }

    out.trim_end().to_string()
}

/// Plain-text report for terminal output
pub fn render_summary(analysis: &ChannelAnalysis) -> String {
    let channel = &analysis.channel_info;
    let mut out = String::new();

    let _ = writeln!(out, "📊 {} ({} subscribers)", channel.title, compact_count(channel.subscriber_count));
    let _ = writeln!(
        out,
        "   {} videos: {} long-form, {} shorts",
        analysis.total_videos, analysis.long_form_count, analysis.shorts_count
    );
    let _ = writeln!(
        out,
        "   Median {} / average {} views, engagement {:.2}%",
        compact_count(analysis.median_views),
        compact_count(analysis.avg_views),
        analysis.engagement_rate
    );

    let _ = writeln!(out, "\nPerformance tiers");
    for tier in &analysis.performance_tiers {
        let _ = writeln!(
            out,
            "  {:<14} {:>8}+  {:>4} videos  {:>3}%",
            tier.label,
            compact_count(tier.threshold),
            tier.count,
            tier.percentage
        );
    }

    let _ = writeln!(out, "\nTop videos");
    for (i, video) in analysis.top_videos.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} ({} views, {})",
            i + 1,
            video.title,
            compact_count(video.view_count),
            format_duration(video.duration_seconds)
        );
    }

    let _ = writeln!(out, "\nTitle patterns (3+ matches)");
    for pattern in analysis.reliable_patterns() {
        let _ = writeln!(
            out,
            "  {:<30} {:>6}%  {} ({} videos)",
            pattern.name,
            signed(pattern.lift),
            pattern.direction.as_str(),
            pattern.match_count
        );
    }

    let _ = writeln!(out, "\nDuration");
    for bucket in &analysis.duration_buckets {
        let marker = if bucket.is_best { " ⭐" } else { "" };
        let _ = writeln!(
            out,
            "  {:<12} {:>4} videos  median {}{}",
            bucket.label,
            bucket.count,
            compact_count(bucket.median_views),
            marker
        );
    }

    let cadence = &analysis.upload_cadence;
    let _ = writeln!(
        out,
        "\nCadence: {} uploads/month, {} uploads/week",
        cadence.avg_uploads_per_month, cadence.avg_uploads_per_week
    );

    out
}
