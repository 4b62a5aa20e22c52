//! Chat-completions scoring oracle
//!
//! Each oracle instance scores the full candidate batch with one request
//! against an OpenAI-style chat-completions endpoint. Instances differ by
//! persona so a panel of oracles judges the batch from independent angles.
//! Responses are returned as raw text; the aggregator owns the parsing.

use crate::error::OracleError;
use crate::rate_limit::RateLimiter;
use crate::types::ScoringOracle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uforge_common::config::ScoringConfig;

/// Default timeout for scoring requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Response budget large enough for a batch of ~100 scored usernames
const MAX_TOKENS: u32 = 3333;

/// Persona system prompts, assigned round-robin by agent id
const PERSONAS: [&str; 3] = [
    "You are an assistant specializing in evaluating the plausibility of usernames. \
     For each username, you will assign a score from 0.01 (highly unlikely to be real) to \
     0.99 (highly likely to be real) based on patterns, typing flow, sentiment analysis, \
     and other linguistic factors.",
    "As an expert in linguistic patterns and user behavior, you evaluate the authenticity \
     of usernames. Score each username from 0.01 (very unlikely to be real) to 0.99 \
     (very likely to be real), considering factors like repetition, typing flow, and sentiment.",
    "You are a critical analyzer of usernames, assessing their probability of being real. \
     For each username, provide a score from 0.01 (highly improbable) to 0.99 (highly probable), \
     using insights from patterns, typing flow, and word sentiment.",
];

/// Scoring oracle backed by a chat-completions endpoint
pub struct ChatScoringOracle {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    agent_id: u32,
    persona: &'static str,
    rate_limiter: RateLimiter,
}

impl ChatScoringOracle {
    /// Create one oracle of a panel; `agent_id` selects the persona
    pub fn new(config: &ScoringConfig, api_key: String, agent_id: u32) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            agent_id,
            persona: PERSONAS[agent_id as usize % PERSONAS.len()],
            rate_limiter: RateLimiter::new(config.rate_limit_ms),
        })
    }

    /// Build the full oracle panel from configuration
    pub fn panel(
        config: &ScoringConfig,
        api_key: &str,
    ) -> Result<Vec<Box<dyn ScoringOracle>>, OracleError> {
        (0..config.oracle_count)
            .map(|agent_id| {
                ChatScoringOracle::new(config, api_key.to_string(), agent_id)
                    .map(|oracle| Box::new(oracle) as Box<dyn ScoringOracle>)
            })
            .collect()
    }
}

#[async_trait]
impl ScoringOracle for ChatScoringOracle {
    fn agent_id(&self) -> u32 {
        self.agent_id
    }

    async fn score(&self, candidates: &[String]) -> Result<String, OracleError> {
        self.rate_limiter.wait().await;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.persona.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(candidates),
                },
            ],
            temperature: self.temperature,
            max_tokens: MAX_TOKENS,
        };

        debug!(
            agent_id = self.agent_id,
            candidates = candidates.len(),
            "Requesting scores from oracle"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api(status.as_u16(), body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(format!("invalid response envelope: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

/// Batch prompt asking for the bracket-delimited score list
fn build_user_prompt(candidates: &[String]) -> String {
    format!(
        "Please analyze the following list of usernames. For each username, provide a score \
         between 0.01 and 0.99 indicating its likelihood of being real. Return the results in \
         JSON format.\n\nList:\n{}\n\nExample format:\n[\n    {{\"username1\": score1}},\n    \
         {{\"username2\": score2}},\n    ...\n]\n",
        candidates.join("\n")
    )
}

// ============================================================================
// Chat API request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}
