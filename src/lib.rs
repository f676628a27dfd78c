//! Ability Tracker - tasks that level up your abilities
//!
//! Resolved tasks are classified by a language model into relevance scores
//! for ten ability tracks; the scores accumulate as experience and levels.

pub mod abilities;
pub mod core;
pub mod llm;
pub mod progression;
pub mod store;
pub mod tasks;
