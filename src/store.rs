//! JSON file store for completed audits, one file per audit
use crate::analysis::ChannelAnalysis;
use crate::llm::recommendations::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Default number of entries returned by [`AuditStore::list`]
pub const HISTORY_LIMIT: usize = 20;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid audit id: {0}")]
    InvalidId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A saved audit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub channel_id: String,
    pub channel_title: String,
    pub channel_thumbnail: String,
    pub channel_subs: u64,
    pub analysis: ChannelAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
}

/// History entry without the analysis payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub channel_id: String,
    pub channel_title: String,
    pub total_videos: usize,
    pub median_views: u64,
    pub has_recommendations: bool,
}

impl From<&AuditRecord> for AuditSummary {
    fn from(record: &AuditRecord) -> Self {
        Self {
            id: record.id.clone(),
            created_at: record.created_at,
            channel_id: record.channel_id.clone(),
            channel_title: record.channel_title.clone(),
            total_videos: record.analysis.total_videos,
            median_views: record.analysis.median_views,
            has_recommendations: record.recommendations.is_some(),
        }
    }
}

/// Opaque audit id: md5 hex of the channel id and creation time
pub fn audit_id(channel_id: &str, created_at: &DateTime<Utc>) -> String {
    let digest = md5::compute(format!("{}:{}", channel_id, created_at.to_rfc3339()));
    format!("{:x}", digest)
}

fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone)]
pub struct AuditStore {
    dir: PathBuf,
}

impl AuditStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    async fn write(&self, record: &AuditRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&record.id)?;
        tokio::fs::write(&path, serde_json::to_string_pretty(record)?).await?;
        Ok(())
    }

    /// Persist a fresh audit and return the stored record
    pub async fn save(&self, analysis: ChannelAnalysis) -> Result<AuditRecord> {
        let created_at = Utc::now();
        let channel = &analysis.channel_info;

        let record = AuditRecord {
            id: audit_id(&channel.channel_id, &created_at),
            created_at,
            channel_id: channel.channel_id.clone(),
            channel_title: channel.title.clone(),
            channel_thumbnail: channel.thumbnail.clone(),
            channel_subs: channel.subscriber_count,
            analysis,
            recommendations: None,
        };

        self.write(&record).await?;
        info!("💾 Saved audit {} for {}", record.id, record.channel_title);
        Ok(record)
    }

    /// `Ok(None)` when no audit has this id
    pub async fn load(&self, id: &str) -> Result<Option<AuditRecord>> {
        let path = self.path_for(id)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No audit stored under {}", id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Attach recommendations to a saved audit; `false` if it does not exist
    pub async fn update_recommendations(&self, id: &str, recommendations: Vec<Recommendation>) -> Result<bool> {
        let Some(mut record) = self.load(id).await? else {
            return Ok(false);
        };

        record.recommendations = Some(recommendations);
        self.write(&record).await?;
        info!("💡 Stored recommendations for audit {}", id);
        Ok(true)
    }

    /// Newest first, at most `limit` entries. Unreadable files are skipped.
    pub async fn list(&self, limit: usize) -> Result<Vec<AuditSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let paths: Vec<PathBuf> = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension().map_or(false, |ext| ext == "json")
                    && p.file_stem().and_then(|s| s.to_str()).map_or(false, is_valid_id)
            })
            .collect();

        let mut summaries = Vec::with_capacity(paths.len());
        for path in paths {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read audit file {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<AuditRecord>(&content) {
                Ok(record) => summaries.push(AuditSummary::from(&record)),
                Err(e) => warn!("Failed to parse audit file {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        summaries.truncate(limit);
        Ok(summaries)
    }

    /// `false` if nothing was stored under `id`
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("🗑️ Deleted audit {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
