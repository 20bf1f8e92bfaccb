mod gemini;
pub mod models;
pub mod prompt;
pub mod response;

pub use gemini::GeminiModel;
pub use models::{AnalysisResult, EventCandidate};
pub use response::{parse_analysis, strip_code_fence};

use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

/// A hosted text-generation model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate free-form text for a prompt
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Turns free-form text into calendar event candidates
#[derive(Clone)]
pub struct SchedulingAnalyzer {
    model: Arc<dyn LanguageModel>,
    time_zone: Tz,
    max_content_chars: usize,
}

impl SchedulingAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>, time_zone: Tz, max_content_chars: usize) -> Self {
        Self {
            model,
            time_zone,
            max_content_chars,
        }
    }

    /// Analyze `content` relative to the current time
    pub async fn analyze(&self, content: &str) -> AppResult<AnalysisResult> {
        self.analyze_at(content, Utc::now()).await
    }

    /// Analyze `content` relative to `now`
    pub async fn analyze_at(&self, content: &str, now: DateTime<Utc>) -> AppResult<AnalysisResult> {
        let prompt = prompt::build_prompt(
            now.with_timezone(&self.time_zone),
            content,
            self.max_content_chars,
        );
        let reply = self.model.generate(&prompt).await?;
        let result = parse_analysis(&reply)?;
        info!("Model proposed {} event(s)", result.events.len());
        Ok(result)
    }
}
