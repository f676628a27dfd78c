use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Classifier response contained no usable scores")]
    NoScores,

    #[error("Persisted state is corrupt: {0}")]
    PersistenceCorrupt(String),

    #[error("Task content is empty")]
    EmptyTask,

    #[error("Task not found: {0:?}")]
    TaskNotFound(crate::core::types::TaskId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
