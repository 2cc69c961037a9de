/// YouTube Data API v3 client
use super::{parse_iso8601_duration, uploads_playlist_id, ChannelInput, ChannelSource, Result, YouTubeError};
use crate::config::YouTubeConfig;
use crate::models::{ChannelMetadata, VideoRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Maximum ids or items per request allowed by the API
const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "totalResults")]
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

type Thumbnails = HashMap<String, Thumbnail>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    custom_url: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: HashMap<String, serde_json::Value>,
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

/// Statistics arrive as decimal strings; missing or hidden counts read as 0
fn stat(statistics: &HashMap<String, serde_json::Value>, key: &str) -> u64 {
    match statistics.get(key) {
        Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0),
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

fn first_thumbnail(thumbnails: &Thumbnails, preference: &[&str]) -> String {
    preference
        .iter()
        .find_map(|size| thumbnails.get(*size))
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

impl From<ChannelItem> for ChannelMetadata {
    fn from(item: ChannelItem) -> Self {
        ChannelMetadata {
            thumbnail: first_thumbnail(&item.snippet.thumbnails, &["medium", "default"]),
            subscriber_count: stat(&item.statistics, "subscriberCount"),
            view_count: stat(&item.statistics, "viewCount"),
            video_count: stat(&item.statistics, "videoCount"),
            channel_id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            custom_url: item.snippet.custom_url,
            published_at: item.snippet.published_at,
        }
    }
}

fn video_from_item(item: VideoItem, description_max_chars: usize) -> VideoRecord {
    let duration = item
        .content_details
        .as_ref()
        .map(|d| parse_iso8601_duration(&d.duration))
        .unwrap_or(0);

    VideoRecord::new(
        item.id,
        item.snippet.title,
        item.snippet.published_at,
        stat(&item.statistics, "viewCount"),
        stat(&item.statistics, "likeCount"),
        stat(&item.statistics, "commentCount"),
        duration,
    )
    .with_thumbnail(first_thumbnail(&item.snippet.thumbnails, &["maxres", "high", "medium"]))
    .with_tags(item.snippet.tags)
    .with_description(item.snippet.description.chars().take(description_max_chars).collect::<String>())
}

/// Map a non-success API response to an error kind
fn classify_error(status: StatusCode, body: &str) -> YouTubeError {
    let (message, reasons) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope.error.message,
            envelope.error.errors.into_iter().map(|e| e.reason).collect::<Vec<_>>(),
        ),
        Err(_) => (body.chars().take(300).collect(), Vec::new()),
    };

    let quota = reasons
        .iter()
        .any(|r| matches!(r.as_str(), "quotaExceeded" | "rateLimitExceeded" | "dailyLimitExceeded"));

    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && quota) {
        YouTubeError::RateLimited(message)
    } else if status == StatusCode::NOT_FOUND {
        YouTubeError::NotFound(message)
    } else {
        YouTubeError::Upstream(format!("{}: {}", status, message))
    }
}

/// Client for the YouTube Data API. Construct one per process and pass it where needed.
#[derive(Clone)]
pub struct YouTubeClient {
    config: YouTubeConfig,
    api_key: String,
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| YouTubeError::Config("YOUTUBE_API_KEY not set".to_string()))?;

        if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
            return Err(YouTubeError::Config(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, api_key, client })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let base = format!("{}/{}", self.config.base_url.trim_end_matches('/'), resource);
        let mut url = Url::parse(&base).map_err(|e| YouTubeError::Config(format!("bad base_url: {}", e)))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<ListResponse<T>> {
        let url = self.endpoint(resource, params)?;
        debug!("GET {} {:?}", resource, params);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn channel_by(&self, param: &str, value: &str, label: &str) -> Result<ChannelMetadata> {
        let response: ListResponse<ChannelItem> = self
            .get("channels", &[("part", "snippet,statistics"), (param, value)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(ChannelMetadata::from)
            .ok_or_else(|| YouTubeError::NotFound(label.to_string()))
    }

    pub async fn fetch_channel_by_id(&self, channel_id: &str) -> Result<ChannelMetadata> {
        self.channel_by("id", channel_id, channel_id).await
    }

    pub async fn fetch_channel_by_handle(&self, handle: &str) -> Result<ChannelMetadata> {
        let handle = handle.trim_start_matches('@');
        self.channel_by("forHandle", handle, &format!("@{}", handle)).await
    }

    pub async fn search_channel(&self, query: &str) -> Result<ChannelMetadata> {
        let response: ListResponse<SearchItem> = self
            .get(
                "search",
                &[("part", "snippet"), ("type", "channel"), ("q", query), ("maxResults", "1")],
            )
            .await?;

        let channel_id = response
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet.channel_id)
            .ok_or_else(|| YouTubeError::NotFound(query.to_string()))?;

        self.fetch_channel_by_id(&channel_id).await
    }

    /// Page through the uploads playlist collecting every video id
    async fn fetch_upload_ids(&self, channel_id: &str) -> Result<Vec<String>> {
        let playlist_id = uploads_playlist_id(channel_id);
        let page_size = self.config.page_size.to_string();
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "contentDetails"),
                ("playlistId", playlist_id.as_str()),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response: ListResponse<PlaylistItem> = self.get("playlistItems", &params).await?;
            if response.items.is_empty() {
                break;
            }

            ids.extend(
                response
                    .items
                    .into_iter()
                    .filter_map(|item| item.content_details.and_then(|d| d.video_id)),
            );

            let total = response
                .page_info
                .and_then(|p| p.total_results)
                .unwrap_or(ids.len() as u64);
            debug!("📥 Collected {}/{} video ids", ids.len(), total);

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(ids)
    }
}

#[async_trait]
impl ChannelSource for YouTubeClient {
    async fn resolve_channel(&self, input: &str) -> Result<ChannelMetadata> {
        match ChannelInput::parse(input)? {
            ChannelInput::ChannelId(id) => self.fetch_channel_by_id(&id).await,
            ChannelInput::Handle(handle) => self.fetch_channel_by_handle(&handle).await,
            ChannelInput::Query(query) => match self.fetch_channel_by_handle(&query).await {
                Ok(channel) => Ok(channel),
                Err(YouTubeError::RateLimited(msg)) => Err(YouTubeError::RateLimited(msg)),
                Err(e) => {
                    debug!("Handle lookup for {} failed ({}), searching instead", query, e);
                    self.search_channel(&query).await
                }
            },
        }
    }

    async fn fetch_all_videos(&self, channel_id: &str) -> Result<Vec<VideoRecord>> {
        let ids = self.fetch_upload_ids(channel_id).await?;
        if ids.is_empty() {
            warn!("No uploads found for {}", channel_id);
            return Ok(Vec::new());
        }

        let mut videos = Vec::with_capacity(ids.len());
        for batch in ids.chunks(self.config.page_size as usize) {
            let joined = batch.join(",");
            let response: ListResponse<VideoItem> = self
                .get("videos", &[("part", "statistics,snippet,contentDetails"), ("id", joined.as_str())])
                .await?;

            videos.extend(
                response
                    .items
                    .into_iter()
                    .map(|item| video_from_item(item, self.config.description_max_chars)),
            );
        }

        videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        info!("📺 Fetched {} videos for {}", videos.len(), channel_id);
        Ok(videos)
    }
}
