//! Inheritors of an estate and the relation categories the allocator understands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relation of an inheritor to the deceased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Husband,
    Wife,
    Son,
    Daughter,
    Father,
    Mother,
    /// Recorded for completeness; never receives a share.
    Other,
}

impl Relation {
    pub const ALL: [Relation; 7] = [
        Self::Husband,
        Self::Wife,
        Self::Son,
        Self::Daughter,
        Self::Father,
        Self::Mother,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person entitled to a percentage of the estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inheritor {
    pub id: String,
    pub name: String,
    pub relation: Relation,
    /// Entitled percentage of the estate, 0 to 100. Owned by the allocator.
    #[serde(default)]
    pub share: f64,
}

impl Inheritor {
    /// New inheritor with a zero share; the allocator fills it in.
    pub fn new(id: impl Into<String>, name: impl Into<String>, relation: Relation) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            relation,
            share: 0.0,
        }
    }

    /// Target value of this inheritor's share of an estate worth `total_value`.
    pub fn target_value(&self, total_value: f64) -> f64 {
        total_value * self.share / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_json_uses_snake_case() {
        let json = serde_json::to_string(&Relation::Daughter).unwrap();
        assert_eq!(json, "\"daughter\"");
        let parsed: Relation = serde_json::from_str("\"husband\"").unwrap();
        assert_eq!(parsed, Relation::Husband);
    }

    #[test]
    fn inheritor_share_defaults_to_zero() {
        let json = r#"{ "id": "a1", "name": "Ayesha", "relation": "wife" }"#;
        let parsed: Inheritor = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.share, 0.0);
        assert_eq!(parsed.relation, Relation::Wife);
    }

    #[test]
    fn target_value_scales_by_share() {
        let mut heir = Inheritor::new("s1", "Bilal", Relation::Son);
        heir.share = 30.0;
        assert_eq!(heir.target_value(2_000_000.0), 600_000.0);
    }
}
