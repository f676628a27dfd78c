//! The full set of ability tracks owned by the store

use crate::abilities::{Ability, AbilityKind};
use crate::core::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of every ability kind to its progress
///
/// Serializes as `label -> {name, experience, level}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct AbilitySet {
    abilities: BTreeMap<AbilityKind, Ability>,
}

/// Stored record, every field optional
#[derive(Deserialize)]
struct StoredAbility {
    #[serde(default)]
    experience: f64,
    #[serde(default = "first_level")]
    level: i64,
}

fn first_level() -> i64 {
    1
}

impl AbilitySet {
    /// All ten abilities at level 1 with no experience
    pub fn fresh() -> Self {
        Self {
            abilities: AbilityKind::all()
                .iter()
                .map(|kind| (*kind, Ability::new(*kind)))
                .collect(),
        }
    }

    pub fn get(&self, kind: AbilityKind) -> Option<&Ability> {
        self.abilities.get(&kind)
    }

    /// Get an ability, creating it fresh on first reference
    pub fn get_or_create(&mut self, kind: AbilityKind) -> &mut Ability {
        self.abilities
            .entry(kind)
            .or_insert_with(|| Ability::new(kind))
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// True when every ability kind has an entry
    pub fn is_complete(&self) -> bool {
        AbilityKind::all()
            .iter()
            .all(|kind| self.abilities.contains_key(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    /// Sum of all levels
    pub fn total_level(&self) -> u32 {
        self.abilities.values().map(|a| a.level).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored set, repairing what can be repaired
    ///
    /// Unknown labels and unreadable records are dropped, missing abilities
    /// are created fresh and out-of-range values are renormalized. Returns
    /// the set and whether any repair happened. A value that is not a JSON
    /// object, or holds no recognizable ability, is corrupt.
    pub fn from_json(json: &str) -> Result<(Self, bool)> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| TrackerError::PersistenceCorrupt(e.to_string()))?;
        let entries = value
            .as_object()
            .ok_or_else(|| TrackerError::PersistenceCorrupt("expected a JSON object".into()))?;

        let mut set = Self::default();
        let mut repaired = false;

        for (label, record) in entries {
            let Some(kind) = AbilityKind::from_label(label) else {
                tracing::warn!("Dropping unknown stored ability {:?}", label);
                repaired = true;
                continue;
            };
            match serde_json::from_value::<StoredAbility>(record.clone()) {
                Ok(stored) => {
                    let ability = Ability::restored(kind, stored.experience, stored.level);
                    if ability.experience != stored.experience
                        || i64::from(ability.level) != stored.level
                    {
                        repaired = true;
                    }
                    set.abilities.insert(kind, ability);
                }
                Err(e) => {
                    tracing::warn!("Dropping unreadable stored ability {}: {}", label, e);
                    repaired = true;
                }
            }
        }

        if set.is_empty() {
            return Err(TrackerError::PersistenceCorrupt(
                "no recognizable abilities".into(),
            ));
        }

        for kind in AbilityKind::all() {
            if !set.abilities.contains_key(kind) {
                set.abilities.insert(*kind, Ability::new(*kind));
                repaired = true;
            }
        }

        Ok((set, repaired))
    }
}

impl<'a> IntoIterator for &'a AbilitySet {
    type Item = &'a Ability;
    type IntoIter = std::collections::btree_map::Values<'a, AbilityKind, Ability>;

    fn into_iter(self) -> Self::IntoIter {
        self.abilities.values()
    }
}
