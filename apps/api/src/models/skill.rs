use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable skill catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub slug: String,
    pub label: String,
}

/// One skill relationship row as stored: a company/project requirement or a
/// developer possession, with its tag still in raw string form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRelationRow {
    pub skill_id: Uuid,
    pub slug: String,
    pub label: String,
    pub tag: String,
}

impl SkillRelationRow {
    pub fn skill(&self) -> Skill {
        Skill {
            id: self.skill_id,
            slug: self.slug.clone(),
            label: self.label.clone(),
        }
    }
}

/// A relationship row joined with its owner, as returned by pool queries.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedSkillRow {
    pub owner_id: Uuid,
    pub skill_id: Uuid,
    pub slug: String,
    pub label: String,
    pub tag: String,
}
