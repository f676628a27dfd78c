//! Active tasks, resolved history and streak counters

use crate::core::error::{Result, TrackerError};
use crate::core::types::TaskId;
use crate::store::kv::KeyValueStore;
use crate::tasks::{Resolution, Task};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const CURRENT_KEY: &str = "current_tasks";
const COMPLETED_KEY: &str = "completed_tasks";
const ABANDONED_KEY: &str = "abandoned_tasks";
const STATS_KEY: &str = "stats";

/// Resolution counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Tasks resolved either way
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub completed: u32,
    /// Completions since the last abandonment
    #[serde(default)]
    pub streak: u32,
}

impl TaskStats {
    pub fn record(&mut self, resolution: Resolution) {
        self.total += 1;
        match resolution {
            Resolution::Completed => {
                self.completed += 1;
                self.streak += 1;
            }
            Resolution::Abandoned => self.streak = 0,
        }
    }

    /// Completed share of resolved tasks, as a whole percentage
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (u64::from(self.completed) * 100 / u64::from(self.total)) as u32
        }
    }
}

/// The user's task lists
///
/// History lists are kept newest first.
pub struct TaskBoard {
    kv: Arc<dyn KeyValueStore>,
    current: Vec<Task>,
    completed: Vec<Task>,
    abandoned: Vec<Task>,
    stats: TaskStats,
}

impl TaskBoard {
    /// Load the board from the store
    ///
    /// Unreadable values come back empty with a warning.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let current: Vec<Task> = read_or_default(kv.as_ref(), CURRENT_KEY).await;
        let mut completed: Vec<Task> = read_or_default(kv.as_ref(), COMPLETED_KEY).await;
        let mut abandoned: Vec<Task> = read_or_default(kv.as_ref(), ABANDONED_KEY).await;
        let stats: TaskStats = read_or_default(kv.as_ref(), STATS_KEY).await;

        completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        abandoned.sort_by(|a, b| b.abandoned_at.cmp(&a.abandoned_at));

        tracing::debug!(
            "Loaded {} current, {} completed, {} abandoned tasks",
            current.len(),
            completed.len(),
            abandoned.len()
        );

        Self {
            kv,
            current,
            completed,
            abandoned,
            stats,
        }
    }

    /// Add a task to the active list
    pub async fn add(&mut self, content: &str) -> Result<Task> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TrackerError::EmptyTask);
        }
        let task = Task::new(content);
        let mut current = self.current.clone();
        current.push(task.clone());
        write_json(self.kv.as_ref(), CURRENT_KEY, &current).await?;
        self.current = current;
        tracing::info!("Added task: {}", task.content);
        Ok(task)
    }

    pub async fn complete(&mut self, id: TaskId) -> Result<Task> {
        self.resolve(id, Resolution::Completed).await
    }

    pub async fn abandon(&mut self, id: TaskId) -> Result<Task> {
        self.resolve(id, Resolution::Abandoned).await
    }

    /// Move a task from the active list into history
    ///
    /// The board only changes once every write succeeded.
    pub async fn resolve(&mut self, id: TaskId, resolution: Resolution) -> Result<Task> {
        let index = self
            .current
            .iter()
            .position(|t| t.id == id)
            .ok_or(TrackerError::TaskNotFound(id))?;

        let mut current = self.current.clone();
        let mut task = current.remove(index);
        task.resolve(resolution);

        let (history_key, mut history) = match resolution {
            Resolution::Completed => (COMPLETED_KEY, self.completed.clone()),
            Resolution::Abandoned => (ABANDONED_KEY, self.abandoned.clone()),
        };
        history.insert(0, task.clone());
        let mut stats = self.stats;
        stats.record(resolution);

        write_json(self.kv.as_ref(), CURRENT_KEY, &current).await?;
        write_json(self.kv.as_ref(), history_key, &history).await?;
        write_json(self.kv.as_ref(), STATS_KEY, &stats).await?;

        self.current = current;
        match resolution {
            Resolution::Completed => self.completed = history,
            Resolution::Abandoned => self.abandoned = history,
        }
        self.stats = stats;

        tracing::info!("{:?} task: {}", resolution, task.content);
        Ok(task)
    }

    pub fn current(&self) -> &[Task] {
        &self.current
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn abandoned(&self) -> &[Task] {
        &self.abandoned
    }

    pub fn stats(&self) -> TaskStats {
        self.stats
    }

}

async fn read_or_default<T: DeserializeOwned + Default>(kv: &dyn KeyValueStore, key: &str) -> T {
    match kv.get(key).await {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", key, e);
            T::default()
        }
    }
}

async fn write_json<T: Serialize + ?Sized>(kv: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    kv.set(key, &json).await
}
