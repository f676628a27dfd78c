//! Task entity and its terminal resolution

use crate::core::types::{now_millis, TaskId, Timestamp};
use serde::{Deserialize, Serialize};

/// How a task left the active list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Completed,
    Abandoned,
}

/// A short textual task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Unix millis, 0 until completed
    #[serde(default)]
    pub completed_at: Timestamp,
    /// Unix millis, 0 until abandoned
    #[serde(default)]
    pub abandoned_at: Timestamp,
}

impl Task {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            content: content.into(),
            is_completed: false,
            completed_at: 0,
            abandoned_at: 0,
        }
    }

    /// Terminal disposition, if the task was resolved
    pub fn resolution(&self) -> Option<Resolution> {
        if self.is_completed {
            Some(Resolution::Completed)
        } else if self.abandoned_at > 0 {
            Some(Resolution::Abandoned)
        } else {
            None
        }
    }

    /// When the task was resolved, if it was
    pub fn resolved_at(&self) -> Option<Timestamp> {
        match self.resolution()? {
            Resolution::Completed => Some(self.completed_at),
            Resolution::Abandoned => Some(self.abandoned_at),
        }
    }

    /// Stamp the task with a resolution at the current time
    pub fn resolve(&mut self, resolution: Resolution) {
        let now = now_millis();
        match resolution {
            Resolution::Completed => {
                self.is_completed = true;
                self.completed_at = now;
            }
            Resolution::Abandoned => {
                self.is_completed = false;
                self.abandoned_at = now;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_unresolved() {
        let task = Task::new("write report");
        assert_eq!(task.resolution(), None);
        assert_eq!(task.resolved_at(), None);
    }

    #[test]
    fn test_complete() {
        let mut task = Task::new("write report");
        task.resolve(Resolution::Completed);
        assert_eq!(task.resolution(), Some(Resolution::Completed));
        assert!(task.completed_at > 0);
        assert_eq!(task.abandoned_at, 0);
    }

    #[test]
    fn test_abandon() {
        let mut task = Task::new("write report");
        task.resolve(Resolution::Abandoned);
        assert_eq!(task.resolution(), Some(Resolution::Abandoned));
        assert_eq!(task.resolved_at(), Some(task.abandoned_at));
    }
}
