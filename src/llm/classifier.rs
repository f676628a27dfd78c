//! Task classification against the ability tracks

use crate::core::error::Result;
use crate::llm::client::TextGenerator;
use crate::llm::prompts::{classification_prompt, welcome_prompt, FALLBACK_WELCOME};
use crate::tasks::Resolution;
use std::sync::Arc;

/// Sends resolved tasks to the generation service
///
/// One network round trip per call, never retried.
#[derive(Clone)]
pub struct TaskClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl TaskClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the model to score a task; returns the raw response text
    ///
    /// Failures are `TrackerError::ClassifierUnavailable` and mean
    /// "no scores available".
    pub async fn classify(
        &self,
        api_key: &str,
        content: &str,
        resolution: Resolution,
    ) -> Result<String> {
        tracing::info!("Classifying {:?} task: {}", resolution, content);
        let prompt = classification_prompt(content, resolution);
        match self.generator.generate(api_key, &prompt).await {
            Ok(text) => {
                tracing::debug!("Classifier response: {}", text);
                Ok(text)
            }
            Err(e) => {
                tracing::error!("Task classification failed: {}", e);
                Err(e)
            }
        }
    }

    /// Short greeting for the front-end; never fails
    pub async fn welcome_message(&self, api_key: Option<&str>) -> String {
        let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return FALLBACK_WELCOME.to_string();
        };
        match self.generator.generate(api_key, &welcome_prompt()).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Failed to generate welcome message: {}", e);
                FALLBACK_WELCOME.to_string()
            }
        }
    }
}
