//! LLM integration: task classification and response parsing

pub mod classifier;
pub mod client;
pub mod parser;
pub mod prompts;

pub use classifier::TaskClassifier;
pub use client::{ApiFormat, LlmClient, TextGenerator};
pub use parser::{parse_scores, FALLBACK_SCORE, RELEVANCE_CUTOFF};
pub use prompts::FALLBACK_WELCOME;
