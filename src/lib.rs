pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod llm;
pub mod logging;
pub mod normalize;
pub mod prompt;
pub mod report;

use async_openai::{config::OpenAIConfig, Client as OpenAIClient};

use crate::llm::GeminiClient;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

/// The configured model integration. Exactly one is active per run; callers
/// dispatch through [`llm::submit_prompt`] and stay provider-agnostic.
#[derive(Clone, Debug)]
pub enum LLMClient {
    Gemini(GeminiClient),
    OpenAI(OpenAIClient<OpenAIConfig>),
}

impl LLMClient {
    /// Short provider label used in logs.
    pub fn provider_name(&self) -> &'static str {
        match self {
            LLMClient::Gemini(_) => "gemini",
            LLMClient::OpenAI(_) => "openai",
        }
    }
}

#[derive(Clone)]
pub struct LLMParams {
    pub llm_client: LLMClient,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}
