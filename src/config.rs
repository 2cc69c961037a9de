use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::llm::{LLMConfig, LLMProvider};

/// Configuration for the channel auditor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Recommendation generation settings
    pub recommendations: RecommendationConfig,

    /// Audit persistence settings
    pub storage: StorageConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Data API key
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Items per page for playlist and video requests (API maximum is 50)
    pub page_size: u32,

    /// Video descriptions are truncated to this many characters
    pub description_max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Generate AI recommendations after each audit
    pub enabled: bool,

    /// Providers tried in order until one succeeds
    pub providers: Vec<LLMConfig>,

    /// Maximum number of recommendations kept
    pub max_recommendations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding saved audits
    pub audit_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Log level
    pub log_level: String,

    /// Pretty-print JSON reports
    pub pretty_json: bool,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = [
            "channel-audit.toml",
            "config/channel-audit.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Err(anyhow!("No configuration file found"))
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            let api_key = api_key.trim().to_string();
            if !api_key.is_empty() {
                self.youtube.api_key = Some(api_key);
            }
        }

        for (var, provider) in [
            ("GEMINI_API_KEY", LLMProvider::Gemini),
            ("DEEPSEEK_API_KEY", LLMProvider::DeepSeek),
        ] {
            if let Ok(key) = std::env::var(var) {
                let key = key.trim().to_string();
                if key.is_empty() {
                    continue;
                }
                for llm in self.recommendations.providers.iter_mut().filter(|p| p.provider == provider) {
                    llm.api_key = Some(key.clone());
                }
            }
        }

        if let Ok(dir) = std::env::var("CHANNEL_AUDIT_STORE_DIR") {
            self.storage.audit_dir = PathBuf::from(dir);
        }

        if let Ok(log_level) = std::env::var("CHANNEL_AUDIT_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.youtube.page_size == 0 || self.youtube.page_size > 50 {
            return Err(anyhow!("page_size must be between 1 and 50"));
        }

        if self.youtube.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.recommendations.enabled && self.recommendations.max_recommendations == 0 {
            return Err(anyhow!("max_recommendations must be greater than 0"));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// LLM providers that have the credentials they need
    pub fn usable_providers(&self) -> Vec<LLMConfig> {
        self.recommendations
            .providers
            .iter()
            .filter(|p| p.api_key.is_some() || p.provider == LLMProvider::LMStudio)
            .cloned()
            .collect()
    }

    /// `tracing` filter directive for this crate; `verbose` forces debug
    pub fn log_filter(&self, verbose: bool) -> String {
        let level = if verbose { "debug" } else { self.output.log_level.as_str() };
        format!("channel_audit={},warn", level)
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Channel Audit Configuration:\n\
            - YouTube API key: {}\n\
            - Page size: {}\n\
            - Recommendations: {} ({} usable providers)\n\
            - Audit directory: {}",
            if self.youtube.api_key.is_some() { "set" } else { "missing" },
            self.youtube.page_size,
            self.recommendations.enabled,
            self.usable_providers().len(),
            self.storage.audit_dir.display(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YouTubeConfig {
                api_key: None,
                base_url: "https://www.googleapis.com/youtube/v3".to_string(),
                timeout_seconds: 30,
                page_size: 50,
                description_max_chars: 500,
            },
            recommendations: RecommendationConfig {
                enabled: true,
                providers: vec![
                    LLMConfig {
                        provider: LLMProvider::Gemini,
                        endpoint: None,
                        api_key: None,
                        model: "gemini-2.5-flash".to_string(),
                        max_tokens: 4096,
                        temperature: 0.7,
                        timeout_seconds: 90,
                    },
                    LLMConfig {
                        provider: LLMProvider::DeepSeek,
                        endpoint: Some("https://api.deepseek.com/chat/completions".to_string()),
                        api_key: None,
                        model: "deepseek-chat".to_string(),
                        max_tokens: 4096,
                        temperature: 0.7,
                        timeout_seconds: 90,
                    },
                ],
                max_recommendations: 7,
            },
            storage: StorageConfig {
                audit_dir: PathBuf::from("./audits"),
            },
            output: OutputConfig {
                log_level: "info".to_string(),
                pretty_json: true,
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_youtube_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = Some(api_key);
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.youtube.base_url = base_url;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config.youtube.page_size = page_size;
        self
    }

    pub fn with_audit_dir(mut self, dir: PathBuf) -> Self {
        self.config.storage.audit_dir = dir;
        self
    }

    pub fn with_providers(mut self, providers: Vec<LLMConfig>) -> Self {
        self.config.recommendations.providers = providers;
        self
    }

    pub fn enable_recommendations(mut self, enable: bool) -> Self {
        self.config.recommendations.enabled = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.youtube.page_size, 50);
        assert_eq!(config.recommendations.providers[0].provider, LLMProvider::Gemini);
        assert_eq!(config.recommendations.max_recommendations, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_youtube_api_key("key".to_string())
            .with_page_size(25)
            .enable_recommendations(false)
            .build();

        assert_eq!(config.youtube.api_key.as_deref(), Some("key"));
        assert_eq!(config.youtube.page_size, 25);
        assert!(!config.recommendations.enabled);
    }

    #[test]
    fn test_config_validation_rejects_page_size() {
        let config = ConfigBuilder::new().with_page_size(51).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_usable_providers_need_keys() {
        let config = Config::default();
        assert!(config.usable_providers().is_empty());

        let mut config = Config::default();
        config.recommendations.providers[1].api_key = Some("sk-test".to_string());
        let usable = config.usable_providers();
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].provider, LLMProvider::DeepSeek);
    }

    #[test]
    fn test_log_filter_follows_output_level() {
        let mut config = Config::default();
        assert_eq!(config.log_filter(false), "channel_audit=info,warn");

        config.output.log_level = "trace".to_string();
        assert_eq!(config.log_filter(false), "channel_audit=trace,warn");
        assert_eq!(config.log_filter(true), "channel_audit=debug,warn");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.youtube.base_url, config.youtube.base_url);
        assert_eq!(parsed.recommendations.providers.len(), 2);
    }
}
