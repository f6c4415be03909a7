// Skill input as it arrives from callers.
//
// Profiles and forms sometimes carry bare names and sometimes richer skill
// records. The engine only ever works with names, so both shapes are flattened
// at the boundary.

use serde::{Deserialize, Serialize};

/// A skill as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skill {
    /// Just the skill name.
    Name(String),
    /// A catalogued skill record.
    Ref {
        /// Identifier in the caller's skill catalogue, if it has one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Display name; the only part the engine uses.
        name: String,
        /// Optional grouping, e.g. `"technical"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        /// Optional importance rank.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
}

impl Skill {
    /// The skill name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Ref { name, .. } => name,
        }
    }
}

impl From<&str> for Skill {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Flattens skills to trimmed names, dropping blanks.
#[must_use]
pub fn normalize_skills(skills: &[Skill]) -> Vec<String> {
    skills
        .iter()
        .map(|skill| skill.name().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
