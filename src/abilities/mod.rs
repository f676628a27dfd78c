//! Ability model
//!
//! Ten fixed ability tracks gain experience from classified tasks.
//! Every 50 points of experience is one level.

pub mod ability;
pub mod kind;
pub mod score;
pub mod set;

pub use ability::{Ability, EXPERIENCE_PER_LEVEL};
pub use kind::AbilityKind;
pub use score::{ScoreMap, MAX_SCORE};
pub use set::AbilitySet;
