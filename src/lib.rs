/// Channel Audit - YouTube channel analytics
///
/// Turns a channel's full upload catalog into performance tiers, title-pattern lift,
/// duration sweet spots, format split and upload cadence, with optional AI recommendations.

pub mod models;
pub mod analysis;
pub mod youtube;
pub mod llm;
pub mod report;
pub mod store;
pub mod config;
pub mod pipeline;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::models::{ChannelMetadata, VideoRecord};
pub use crate::analysis::{analyze_channel, ChannelAnalysis};
pub use crate::youtube::{CatalogSnapshot, ChannelInput, ChannelSource, YouTubeClient, YouTubeError};
pub use crate::llm::{LLMConfig, LLMProvider};
pub use crate::llm::recommendations::{Recommendation, RecommendationGenerator};
pub use crate::store::{AuditRecord, AuditStore, AuditSummary};
pub use crate::pipeline::{audit_channel, PipelineError};
