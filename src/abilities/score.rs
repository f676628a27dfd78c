//! Per-task relevance scores

use crate::abilities::AbilityKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Highest relevance score the classifier may assign
pub const MAX_SCORE: f64 = 5.0;

/// Relevance score per ability for one classified task
///
/// Iterates in ability declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScoreMap(BTreeMap<AbilityKind, f64>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score, clamped to `[0.0, MAX_SCORE]`
    pub fn insert(&mut self, kind: AbilityKind, score: f64) {
        let score = if score.is_finite() {
            score.clamp(0.0, MAX_SCORE)
        } else {
            0.0
        };
        self.0.insert(kind, score);
    }

    pub fn get(&self, kind: AbilityKind) -> Option<f64> {
        self.0.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityKind, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Highest-scoring ability
    pub fn strongest(&self) -> Option<(AbilityKind, f64)> {
        self.iter()
            .fold(None, |best: Option<(AbilityKind, f64)>, (kind, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((kind, score)),
            })
    }
}

impl IntoIterator for ScoreMap {
    type Item = (AbilityKind, f64);
    type IntoIter = std::collections::btree_map::IntoIter<AbilityKind, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_clamps() {
        let mut scores = ScoreMap::new();
        scores.insert(AbilityKind::Focus, 9.0);
        scores.insert(AbilityKind::Language, -1.0);
        scores.insert(AbilityKind::Learning, f64::NAN);
        assert_eq!(scores.get(AbilityKind::Focus), Some(MAX_SCORE));
        assert_eq!(scores.get(AbilityKind::Language), Some(0.0));
        assert_eq!(scores.get(AbilityKind::Learning), Some(0.0));
    }

    #[test]
    fn test_iterates_in_declaration_order() {
        let mut scores = ScoreMap::new();
        scores.insert(AbilityKind::Unknown, 1.0);
        scores.insert(AbilityKind::Creativity, 2.0);
        scores.insert(AbilityKind::Focus, 3.0);
        let order: Vec<_> = scores.iter().map(|(k, _)| k).collect();
        assert_eq!(
            order,
            vec![AbilityKind::Creativity, AbilityKind::Focus, AbilityKind::Unknown]
        );
    }

    #[test]
    fn test_strongest() {
        let mut scores = ScoreMap::new();
        assert_eq!(scores.strongest(), None);
        scores.insert(AbilityKind::Creativity, 2.0);
        scores.insert(AbilityKind::Focus, 4.5);
        scores.insert(AbilityKind::Unknown, 1.0);
        assert_eq!(scores.strongest(), Some((AbilityKind::Focus, 4.5)));
    }
}
