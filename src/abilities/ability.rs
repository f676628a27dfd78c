//! Experience and level progression for a single ability

use crate::abilities::AbilityKind;
use serde::{Deserialize, Serialize};

/// Experience required to advance one level
pub const EXPERIENCE_PER_LEVEL: f64 = 50.0;

/// Progress of one ability track
///
/// `experience` is always in `[0, EXPERIENCE_PER_LEVEL)`; overflow carries
/// into `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: AbilityKind,
    pub experience: f64,
    pub level: u32,
}

impl Ability {
    /// Fresh ability: no experience, level 1
    pub fn new(name: AbilityKind) -> Self {
        Self {
            name,
            experience: 0.0,
            level: 1,
        }
    }

    /// Rebuild an ability from possibly out-of-range stored values
    pub fn restored(name: AbilityKind, experience: f64, level: i64) -> Self {
        let mut ability = Self {
            name,
            experience: 0.0,
            level: level.clamp(1, u32::MAX as i64) as u32,
        };
        ability.add_experience(experience);
        ability
    }

    /// Add experience and carry full thresholds into levels
    ///
    /// Negative and non-finite amounts are treated as zero.
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: f64) -> u32 {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.experience += amount;

        let mut gained = 0u32;
        if self.experience >= EXPERIENCE_PER_LEVEL {
            let whole = (self.experience / EXPERIENCE_PER_LEVEL).floor();
            self.experience -= whole * EXPERIENCE_PER_LEVEL;
            gained = whole as u32;
        }
        // Float residue from the division above
        while self.experience >= EXPERIENCE_PER_LEVEL {
            self.experience -= EXPERIENCE_PER_LEVEL;
            gained = gained.saturating_add(1);
        }
        if self.experience < 0.0 {
            self.experience = 0.0;
        }

        self.level = self.level.saturating_add(gained);
        gained
    }

    /// Fraction of the way to the next level (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        self.experience / EXPERIENCE_PER_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ability() {
        let ability = Ability::new(AbilityKind::Focus);
        assert_eq!(ability.experience, 0.0);
        assert_eq!(ability.level, 1);
    }

    #[test]
    fn test_add_below_threshold() {
        let mut ability = Ability::new(AbilityKind::Focus);
        assert_eq!(ability.add_experience(3.5), 0);
        assert_eq!(ability.experience, 3.5);
        assert_eq!(ability.level, 1);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut ability = Ability::new(AbilityKind::Focus);
        assert_eq!(ability.add_experience(50.0), 1);
        assert_eq!(ability.experience, 0.0);
        assert_eq!(ability.level, 2);
    }

    #[test]
    fn test_overflow_carries() {
        let mut ability = Ability::new(AbilityKind::Creativity);
        ability.add_experience(55.0);
        assert_eq!(ability.level, 2);
        assert!((ability.experience - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_levels_at_once() {
        let mut ability = Ability::new(AbilityKind::Creativity);
        ability.add_experience(40.0);
        assert_eq!(ability.add_experience(125.0), 3);
        assert_eq!(ability.level, 4);
        assert!((ability.experience - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_is_noop() {
        let mut ability = Ability::new(AbilityKind::Language);
        ability.add_experience(12.0);
        let before = ability.clone();
        ability.add_experience(0.0);
        assert_eq!(ability, before);
    }

    #[test]
    fn test_negative_and_nan_clamped() {
        let mut ability = Ability::new(AbilityKind::Language);
        ability.add_experience(10.0);
        ability.add_experience(-4.0);
        ability.add_experience(f64::NAN);
        ability.add_experience(f64::INFINITY);
        assert_eq!(ability.experience, 10.0);
        assert_eq!(ability.level, 1);
    }

    #[test]
    fn test_restored_normalizes() {
        let ability = Ability::restored(AbilityKind::Endurance, 120.0, 0);
        assert_eq!(ability.level, 3);
        assert!((ability.experience - 20.0).abs() < 1e-9);

        let ability = Ability::restored(AbilityKind::Endurance, -3.0, 7);
        assert_eq!(ability.level, 7);
        assert_eq!(ability.experience, 0.0);
    }

    #[test]
    fn test_progress() {
        let mut ability = Ability::new(AbilityKind::Focus);
        ability.add_experience(25.0);
        assert!((ability.progress() - 0.5).abs() < 1e-9);
    }
}
