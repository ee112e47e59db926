//! Requirement/possession extraction.
//!
//! Normalises a requester's raw relationship rows into a typed, de-duplicated
//! skill set. An empty result is a signal (`Extraction::Empty`), not an error:
//! the engine answers it with a guidance message and never loads a pool.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::matching::tags::{Importance, Level};
use crate::models::skill::{Skill, SkillRelationRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: Skill,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPossession {
    pub skill: Skill,
    pub level: Level,
}

/// The requester side of a match: what a company or project needs, or what a
/// developer has.
#[derive(Debug, Clone, PartialEq)]
pub enum RequesterSkills {
    Requirements(Vec<SkillRequirement>),
    Possessions(Vec<SkillPossession>),
}

impl RequesterSkills {
    pub fn skill_ids(&self) -> Vec<Uuid> {
        match self {
            Self::Requirements(reqs) => reqs.iter().map(|r| r.skill.id).collect(),
            Self::Possessions(possessions) => possessions.iter().map(|p| p.skill.id).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Empty,
    Ready(RequesterSkills),
}

/// Parses company/project requirement rows. Unknown importance tags are dropped.
pub fn extract_requirements(rows: &[SkillRelationRow]) -> Extraction {
    let reqs: Vec<SkillRequirement> = dedup(rows)
        .filter_map(|row| match Importance::parse(&row.tag) {
            Some(importance) => Some(SkillRequirement {
                skill: row.skill(),
                importance,
            }),
            None => {
                warn!("Ignoring requirement on '{}': unknown importance '{}'", row.slug, row.tag);
                None
            }
        })
        .collect();

    if reqs.is_empty() {
        Extraction::Empty
    } else {
        Extraction::Ready(RequesterSkills::Requirements(reqs))
    }
}

/// Parses developer possession rows. Unknown level tags are dropped.
pub fn extract_possessions(rows: &[SkillRelationRow]) -> Extraction {
    let possessions: Vec<SkillPossession> = dedup(rows)
        .filter_map(|row| match Level::parse(&row.tag) {
            Some(level) => Some(SkillPossession {
                skill: row.skill(),
                level,
            }),
            None => {
                warn!("Ignoring skill '{}': unknown level '{}'", row.slug, row.tag);
                None
            }
        })
        .collect();

    if possessions.is_empty() {
        Extraction::Empty
    } else {
        Extraction::Ready(RequesterSkills::Possessions(possessions))
    }
}

/// First occurrence of each skill id wins.
fn dedup(rows: &[SkillRelationRow]) -> impl Iterator<Item = &SkillRelationRow> {
    let mut seen = HashSet::new();
    rows.iter().filter(move |row| seen.insert(row.skill_id))
}
