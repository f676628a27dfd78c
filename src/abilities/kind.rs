//! The ten fixed ability tracks

use serde::{Deserialize, Serialize};

/// Ability categories credited by classified tasks
///
/// Serialized with the display labels used by the stored data and by the
/// classifier prompt, so a response key maps straight onto a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    #[serde(rename = "創意力")]
    Creativity,
    #[serde(rename = "耐力")]
    Endurance,
    #[serde(rename = "學習力")]
    Learning,
    #[serde(rename = "理解力")]
    Comprehension,
    #[serde(rename = "社交力")]
    Sociability,
    #[serde(rename = "專注力")]
    Focus,
    #[serde(rename = "金錢力")]
    FinancialSense,
    #[serde(rename = "語言力")]
    Language,
    #[serde(rename = "溝通力")]
    Communication,
    /// Catch-all credited when nothing else is clearly relevant
    #[serde(rename = "未知力")]
    Unknown,
}

impl AbilityKind {
    /// Get all abilities, in display order
    pub fn all() -> &'static [AbilityKind] {
        &[
            AbilityKind::Creativity,
            AbilityKind::Endurance,
            AbilityKind::Learning,
            AbilityKind::Comprehension,
            AbilityKind::Sociability,
            AbilityKind::Focus,
            AbilityKind::FinancialSense,
            AbilityKind::Language,
            AbilityKind::Communication,
            AbilityKind::Unknown,
        ]
    }

    /// Every ability except the catch-all
    pub fn scored() -> impl Iterator<Item = AbilityKind> {
        Self::all().iter().copied().filter(|k| !k.is_catch_all())
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, AbilityKind::Unknown)
    }

    /// Label used in storage and in classifier responses
    pub fn label(&self) -> &'static str {
        match self {
            AbilityKind::Creativity => "創意力",
            AbilityKind::Endurance => "耐力",
            AbilityKind::Learning => "學習力",
            AbilityKind::Comprehension => "理解力",
            AbilityKind::Sociability => "社交力",
            AbilityKind::Focus => "專注力",
            AbilityKind::FinancialSense => "金錢力",
            AbilityKind::Language => "語言力",
            AbilityKind::Communication => "溝通力",
            AbilityKind::Unknown => "未知力",
        }
    }

    /// English name
    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::Creativity => "Creativity",
            AbilityKind::Endurance => "Endurance",
            AbilityKind::Learning => "Learning",
            AbilityKind::Comprehension => "Comprehension",
            AbilityKind::Sociability => "Sociability",
            AbilityKind::Focus => "Focus",
            AbilityKind::FinancialSense => "Financial Sense",
            AbilityKind::Language => "Language",
            AbilityKind::Communication => "Communication",
            AbilityKind::Unknown => "Unknown Force",
        }
    }

    /// Look up an ability by its stored label
    pub fn from_label(label: &str) -> Option<AbilityKind> {
        Self::all().iter().copied().find(|k| k.label() == label.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_abilities() {
        assert_eq!(AbilityKind::all().len(), 10);
        assert_eq!(AbilityKind::scored().count(), 9);
    }

    #[test]
    fn test_label_roundtrip() {
        for kind in AbilityKind::all() {
            assert_eq!(AbilityKind::from_label(kind.label()), Some(*kind));
        }
        assert_eq!(AbilityKind::from_label("力量"), None);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&AbilityKind::FinancialSense).unwrap();
        assert_eq!(json, "\"金錢力\"");
    }

    #[test]
    fn test_catch_all() {
        assert!(AbilityKind::Unknown.is_catch_all());
        assert!(!AbilityKind::Focus.is_catch_all());
    }
}
