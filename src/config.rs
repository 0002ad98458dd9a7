use std::env;

use async_openai::config::OpenAIConfig;
use async_openai::Client as OpenAIClient;
use clap::ValueEnum;

use crate::error::AnalysisError;
use crate::llm::GeminiClient;
use crate::{LLMClient, LLMParams};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Supported model providers. Exactly one is used per run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    #[clap(name = "gemini")]
    Gemini,
    #[clap(name = "openai")]
    OpenAI,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenAI => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Resolved run configuration. Credentials are read once here, at startup;
/// nothing downstream touches the environment.
#[derive(Clone)]
pub struct Settings {
    pub provider: Provider,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    google_api_key: Option<String>,
    openai_api_key: Option<String>,
}

impl Settings {
    /// Combines command-line values with the environment. An explicit flag
    /// value wins over the corresponding environment variable; blank values
    /// are treated as absent.
    pub fn resolve(
        provider: Provider,
        model: Option<String>,
        temperature: f32,
        max_tokens: u32,
        google_api_key: Option<String>,
        openai_api_key: Option<String>,
    ) -> Self {
        let model =
            non_blank(model).unwrap_or_else(|| provider.default_model().to_string());

        Settings {
            provider,
            model,
            temperature,
            max_tokens,
            google_api_key: resolve_credential(google_api_key, GOOGLE_API_KEY_ENV),
            openai_api_key: resolve_credential(openai_api_key, OPENAI_API_KEY_ENV),
        }
    }

    /// Parameters for the provider gateway, including a ready client for the
    /// selected provider. Fails up front when the credential is missing so a
    /// run never fetches pages it cannot analyze.
    pub fn llm_params(&self) -> Result<LLMParams, AnalysisError> {
        let llm_client = self.build_llm_client()?;
        Ok(LLMParams {
            llm_client,
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }

    fn build_llm_client(&self) -> Result<LLMClient, AnalysisError> {
        match self.provider {
            Provider::Gemini => {
                let api_key = self
                    .google_api_key
                    .as_deref()
                    .ok_or_else(|| missing_credential("Gemini", "--google-api-key", GOOGLE_API_KEY_ENV))?;
                let client = GeminiClient::new(api_key).map_err(|e| {
                    AnalysisError::ProviderUnavailable {
                        reason: e.to_string(),
                    }
                })?;
                Ok(LLMClient::Gemini(client))
            }
            Provider::OpenAI => {
                let api_key = self
                    .openai_api_key
                    .as_deref()
                    .ok_or_else(|| missing_credential("OpenAI", "--openai-api-key", OPENAI_API_KEY_ENV))?;
                let config = OpenAIConfig::new().with_api_key(api_key);
                Ok(LLMClient::OpenAI(OpenAIClient::with_config(config)))
            }
        }
    }
}

fn missing_credential(provider: &str, flag: &str, env_key: &str) -> AnalysisError {
    AnalysisError::ProviderUnavailable {
        reason: format!(
            "no {} API key configured; pass {} or set {}, or use --prompt-only to skip submission",
            provider, flag, env_key
        ),
    }
}

fn resolve_credential(explicit: Option<String>, env_key: &str) -> Option<String> {
    non_blank(explicit).or_else(|| non_blank(env::var(env_key).ok()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
