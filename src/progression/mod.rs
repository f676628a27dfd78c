//! Progression: turning resolved tasks into ability experience

pub mod coordinator;

pub use coordinator::ProgressionCoordinator;
