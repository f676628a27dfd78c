//! Resolve a task into ability experience
//!
//! credential -> classify -> parse -> apply each score to the store.
//! Any failure before the apply step leaves the abilities untouched.

use crate::abilities::ScoreMap;
use crate::core::error::{Result, TrackerError};
use crate::llm::classifier::TaskClassifier;
use crate::llm::parser::parse_scores;
use crate::store::abilities::AbilityStore;
use crate::tasks::{Resolution, Task};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub struct ProgressionCoordinator {
    store: Arc<AbilityStore>,
    classifier: TaskClassifier,
    /// Keeps two resolutions from interleaving their score applications
    apply_lock: Mutex<()>,
}

impl ProgressionCoordinator {
    pub fn new(store: Arc<AbilityStore>, classifier: TaskClassifier) -> Self {
        Self {
            store,
            classifier,
            apply_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<AbilityStore> {
        &self.store
    }

    pub fn classifier(&self) -> &TaskClassifier {
        &self.classifier
    }

    /// Classify a resolved task and credit its scores
    ///
    /// Returns the applied scores, or why nothing was applied:
    /// `MissingCredential`, `ClassifierUnavailable` or `NoScores`.
    /// Scores are applied one ability at a time; each application is
    /// published as it happens.
    pub async fn resolve_task(&self, task: &Task, resolution: Resolution) -> Result<ScoreMap> {
        let Some(api_key) = self.store.credential().await else {
            tracing::warn!("No API key configured; skipping classification");
            return Err(TrackerError::MissingCredential);
        };

        let raw = self
            .classifier
            .classify(&api_key, &task.content, resolution)
            .await
            .map_err(|e| match e {
                TrackerError::ClassifierUnavailable(_) => e,
                other => TrackerError::ClassifierUnavailable(other.to_string()),
            })?;

        let scores = parse_scores(&raw);
        if scores.is_empty() {
            tracing::warn!("No usable scores for task: {}", task.content);
            return Err(TrackerError::NoScores);
        }

        let _guard = self.apply_lock.lock().await;
        for (kind, score) in scores.iter() {
            self.store.apply_score(kind, score).await;
        }

        if let Some((kind, score)) = scores.strongest() {
            tracing::info!(
                "Abilities updated for \"{}\" (strongest: {} {:.1})",
                task.content,
                kind.name(),
                score
            );
        }
        Ok(scores)
    }

    /// Run `resolve_task` in the background
    ///
    /// The caller is never blocked; await the handle to observe the outcome.
    /// Dropping the handle detaches the work.
    pub fn spawn_resolution(
        self: &Arc<Self>,
        task: Task,
        resolution: Resolution,
    ) -> JoinHandle<Result<ScoreMap>> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.resolve_task(&task, resolution).await })
    }
}
