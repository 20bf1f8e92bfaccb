use super::LanguageModel;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use tracing::info;

const SYSTEM_PROMPT: &str = "You are a scheduling assistant. You read notices, memos and short instructions and extract calendar events from them. You answer with JSON only.";

/// Hosted Gemini model reached through Rig
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
}

impl GeminiModel {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        info!("Sending scheduling prompt to Gemini model {}", self.model);

        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PROMPT)
            .temperature(0.2)
            .build();

        let response = agent
            .chat(prompt, Vec::<Message>::new())
            .await
            .map_err(|e| Error::LanguageModel(format!("Gemini request failed: {}", e)))?;

        info!("Received response from Gemini ({} bytes)", response.len());
        Ok(response)
    }
}
