use super::{create_llm, ChatMessage, LLMConfig, LLM};
use crate::analysis::ChannelAnalysis;
use crate::report::build_recommendation_prompt;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One actionable recommendation for the channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
    pub priority: Priority,
    /// One of content, packaging, format, schedule, growth
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct RecommendationResponse {
    recommendations: Option<Vec<Recommendation>>,
}

const SYSTEM_PROMPT: &str = r#"You are a YouTube strategy consultant. Given quantitative analysis data for a YouTube channel, generate 5-7 actionable, data-backed recommendations ranked by potential impact.

Each recommendation must:
- Reference specific data points from the analysis
- Be actionable (what to do, not just what's wrong)
- Include the "why" backed by the numbers
- Be prioritized (high/medium/low)

Categories: "content", "packaging", "format", "schedule", "growth"

Respond ONLY with valid JSON:
{
  "recommendations": [
    {
      "title": "Short actionable title",
      "detail": "2-3 sentence explanation with specific data references",
      "priority": "high|medium|low",
      "category": "content|packaging|format|schedule|growth"
    }
  ]
}"#;

/// Generates recommendations, trying each configured provider in turn
pub struct RecommendationGenerator {
    llms: Vec<Box<dyn LLM>>,
    max_recommendations: usize,
}

impl RecommendationGenerator {
    pub fn new(llms: Vec<Box<dyn LLM>>, max_recommendations: usize) -> Self {
        Self { llms, max_recommendations }
    }

    /// Build providers from config, skipping any that cannot be constructed
    pub fn from_configs(configs: &[LLMConfig], max_recommendations: usize) -> Result<Self> {
        let llms: Vec<Box<dyn LLM>> = configs
            .iter()
            .filter_map(|config| match create_llm(config) {
                Ok(llm) => Some(llm),
                Err(e) => {
                    debug!("Skipping {:?}: {}", config.provider, e);
                    None
                }
            })
            .collect();

        if llms.is_empty() {
            return Err(anyhow!("No AI API key configured. Set GEMINI_API_KEY or DEEPSEEK_API_KEY."));
        }

        Ok(Self::new(llms, max_recommendations))
    }

    pub async fn generate(&self, analysis: &ChannelAnalysis) -> Result<Vec<Recommendation>> {
        let prompt = build_recommendation_prompt(analysis);
        let mut last_error = None;

        for llm in &self.llms {
            let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt.clone())];

            match llm.chat(messages).await {
                Ok(response) => {
                    debug!(
                        "{:?} answered (tokens: {:?})",
                        llm.provider_type(),
                        response.tokens_used
                    );
                    let recommendations = parse_recommendations(&response.content, self.max_recommendations)?;
                    info!("💡 Generated {} recommendations", recommendations.len());
                    return Ok(recommendations);
                }
                Err(e) => {
                    warn!("{:?} failed, trying next provider: {}", llm.provider_type(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("No LLM providers configured")))
    }
}

/// Parse `{"recommendations": [...]}`, tolerating markdown code fences
pub fn parse_recommendations(content: &str, max: usize) -> Result<Vec<Recommendation>> {
    let cleaned = strip_code_fences(content);

    let parsed: RecommendationResponse = serde_json::from_str(&cleaned).map_err(|_| {
        anyhow!(
            "AI returned invalid JSON: {}",
            cleaned.chars().take(200).collect::<String>()
        )
    })?;

    let mut recommendations = parsed
        .recommendations
        .ok_or_else(|| anyhow!("Invalid recommendations response"))?;
    recommendations.truncate(max);
    Ok(recommendations)
}

fn strip_code_fences(content: &str) -> String {
    let content = content.trim();

    if content.starts_with("```") {
        if let (Some(start), Some(end)) = (content.find('\n'), content.rfind("```")) {
            if end > start {
                return content[start + 1..end].trim().to_string();
            }
        }
    }

    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_channel;
    use crate::llm::{LLMProvider, LLMResponse};
    use crate::models::ChannelMetadata;
    use async_trait::async_trait;

    struct CannedLLM {
        reply: Option<String>,
    }

    #[async_trait]
    impl LLM for CannedLLM {
        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<LLMResponse> {
            match &self.reply {
                Some(content) => Ok(LLMResponse { content: content.clone(), tokens_used: None }),
                None => Err(anyhow!("offline")),
            }
        }

        fn provider_type(&self) -> LLMProvider {
            LLMProvider::LMStudio
        }
    }

    fn reply(count: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"title":"Tip {}","detail":"Because","priority":"high","category":"content"}}"#,
                    i
                )
            })
            .collect();
        format!(r#"{{"recommendations":[{}]}}"#, items.join(","))
    }

    #[test]
    fn test_parse_caps_at_max() {
        let parsed = parse_recommendations(&reply(9), 7).unwrap();
        assert_eq!(parsed.len(), 7);
        assert_eq!(parsed[0].priority, Priority::High);
    }

    #[test]
    fn test_parse_fenced_and_invalid() {
        let fenced = format!("```json\n{}\n```", reply(2));
        assert_eq!(parse_recommendations(&fenced, 7).unwrap().len(), 2);
        assert!(parse_recommendations("not json", 7).is_err());
        assert!(parse_recommendations(r#"{"other":[]}"#, 7).is_err());
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let llms: Vec<Box<dyn LLM>> = vec![
            Box::new(CannedLLM { reply: None }),
            Box::new(CannedLLM { reply: Some(reply(3)) }),
        ];
        let generator = RecommendationGenerator::new(llms, 7);
        let analysis = analyze_channel(&[], ChannelMetadata::default());

        let recommendations = generator.generate(&analysis).await.unwrap();
        assert_eq!(recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_all_providers_failing_is_an_error() {
        let llms: Vec<Box<dyn LLM>> = vec![Box::new(CannedLLM { reply: None })];
        let generator = RecommendationGenerator::new(llms, 7);
        let analysis = analyze_channel(&[], ChannelMetadata::default());
        assert!(generator.generate(&analysis).await.is_err());
    }

    #[test]
    fn test_from_configs_without_keys_fails() {
        let configs = vec![LLMConfig::default()];
        assert!(RecommendationGenerator::from_configs(&configs, 7).is_err());
    }
}
