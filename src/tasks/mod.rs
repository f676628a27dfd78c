//! Task tracking
//!
//! Tasks are added to an active list and leave it by being completed or
//! abandoned. Each resolution feeds the ability progression.

pub mod board;
pub mod task;

pub use board::{TaskBoard, TaskStats};
pub use task::{Resolution, Task};
