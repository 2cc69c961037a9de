//! Resolve, fetch, analyse
use crate::analysis::{analyze_channel, ChannelAnalysis};
use crate::youtube::{ChannelSource, YouTubeError};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Channel URL or handle required")]
    EmptyInput,

    #[error("No videos found for channel {0}")]
    NoVideos(String),

    #[error(transparent)]
    Source(#[from] YouTubeError),
}

/// Run a full audit of the channel named by `input` against `source`
pub async fn audit_channel(source: &dyn ChannelSource, input: &str) -> Result<ChannelAnalysis, PipelineError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let start_time = Instant::now();

    let channel = source.resolve_channel(input).await?;
    info!("📺 Resolved {} ({})", channel.title, channel.channel_id);

    let videos = source.fetch_all_videos(&channel.channel_id).await?;
    if videos.is_empty() {
        return Err(PipelineError::NoVideos(channel.channel_id));
    }
    info!("🎬 Fetched {} videos", videos.len());

    let analysis = analyze_channel(&videos, channel);
    info!(
        "📊 Analysis completed in {:.2}s: {} long-form, {} shorts",
        start_time.elapsed().as_secs_f64(),
        analysis.long_form_count,
        analysis.shorts_count
    );

    Ok(analysis)
}
