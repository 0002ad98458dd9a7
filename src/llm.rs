use std::fmt;
use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client as OpenAIClient;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::error::AnalysisError;
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

/// Budget for one request to a model provider.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sends one prompt to the configured provider and returns the reply text.
/// Retries transient failures with exponential backoff; only after the last
/// attempt does the failure surface as `ProviderUnavailable`.
pub async fn submit_prompt(
    prompt: &str,
    system_instruction: &str,
    params: &LLMParams,
) -> Result<String, AnalysisError> {
    let max_retries = 3;
    let mut backoff = 2;
    let mut last_failure = String::new();

    debug!(
        target: TARGET_LLM_REQUEST,
        "Submitting {} character prompt to {} model {}",
        prompt.chars().count(),
        params.llm_client.provider_name(),
        params.model
    );

    for retry_count in 0..max_retries {
        match timeout(
            PROVIDER_TIMEOUT,
            request_completion(prompt, system_instruction, params),
        )
        .await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                info!(
                    target: TARGET_LLM_REQUEST,
                    "Received {} characters from {}",
                    text.chars().count(),
                    params.llm_client.provider_name()
                );
                return Ok(text);
            }
            Ok(Ok(_)) => {
                last_failure = "provider returned an empty reply".to_string();
                warn!(target: TARGET_LLM_REQUEST, "Empty reply from {}", params.llm_client.provider_name());
            }
            Ok(Err(e)) => {
                last_failure = e.to_string();
                warn!(target: TARGET_LLM_REQUEST, "Provider request failed: {}", e);
            }
            Err(_) => {
                last_failure = format!(
                    "request timed out after {} seconds",
                    PROVIDER_TIMEOUT.as_secs()
                );
                warn!(target: TARGET_LLM_REQUEST, "Provider request timed out");
            }
        }

        if retry_count < max_retries - 1 {
            debug!(target: TARGET_LLM_REQUEST, "Backing off for {} seconds before retry", backoff);
            sleep(Duration::from_secs(backoff)).await;
            backoff *= 2; // Exponential backoff
        }
    }

    error!(
        target: TARGET_LLM_REQUEST,
        "No reply from {} after {} attempts: {}",
        params.llm_client.provider_name(),
        max_retries,
        last_failure
    );
    Err(AnalysisError::ProviderUnavailable {
        reason: format!("{} ({} attempts)", last_failure, max_retries),
    })
}

async fn request_completion(
    prompt: &str,
    system_instruction: &str,
    params: &LLMParams,
) -> anyhow::Result<String> {
    match &params.llm_client {
        LLMClient::Gemini(client) => {
            client
                .generate(
                    &params.model,
                    system_instruction,
                    prompt,
                    params.temperature,
                    params.max_tokens,
                )
                .await
        }
        LLMClient::OpenAI(client) => {
            request_openai(
                client,
                &params.model,
                system_instruction,
                prompt,
                params.temperature,
                params.max_tokens,
            )
            .await
        }
    }
}

async fn request_openai(
    client: &OpenAIClient<OpenAIConfig>,
    model: &str,
    system_instruction: &str,
    prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> anyhow::Result<String> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .temperature(temperature)
        .max_tokens(max_tokens)
        .messages([
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_instruction)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ])
        .build()?;

    let response = client.chat().create(request).await?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| anyhow::anyhow!("OpenAI reply contained no message content"))
}

/// Minimal Gemini REST client. The official SDKs are not used anywhere in
/// this codebase, and the generateContent call is small enough to pin here.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create Gemini HTTP client: {}", e))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
        })
    }

    /// One generateContent call: system instruction and user prompt in,
    /// concatenated candidate text out.
    pub async fn generate(
        &self,
        model: &str,
        system_instruction: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, model);
        let body = gemini_request_body(system_instruction, prompt, temperature, max_tokens);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini API returned {}: {}",
                status,
                detail.chars().take(500).collect::<String>()
            );
        }

        let payload: GeminiResponse = response.json().await?;
        candidate_text(payload).ok_or_else(|| anyhow::anyhow!("Gemini reply contained no candidate text"))
    }
}

// Manual Debug so the API key never lands in logs.
impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient").finish_non_exhaustive()
    }
}

fn gemini_request_body(
    system_instruction: &str,
    prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> Value {
    json!({
        "system_instruction": {
            "parts": [{ "text": system_instruction }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "temperature": temperature,
            "maxOutputTokens": max_tokens
        }
    })
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

/// Text of the first candidate, with multi-part replies concatenated.
fn candidate_text(response: GeminiResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let parts = candidate.content?.parts;
    let text: String = parts.into_iter().filter_map(|part| part.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
