//! Candidate pool types: opposite-role profiles joined with their full skill sets.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::matching::tags::{Availability, CompanySize, Importance, Level, WorkStyle};
use crate::models::profile::{CompanyProfileRow, DeveloperProfileRow};
use crate::models::skill::{OwnedSkillRow, Skill};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperCandidate {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub headline: Option<String>,
    pub availability: Option<Availability>,
    pub hourly_rate: Option<i32>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Every skill the developer holds, not only the overlap with the requester.
    pub skills: Vec<(Skill, Level)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCandidate {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub industry: Option<String>,
    pub size: Option<CompanySize>,
    pub work_style: Option<WorkStyle>,
    pub team_size: Option<i32>,
    pub created_at: DateTime<Utc>,
    /// Every skill the company asks for, with the company's importance tag.
    pub skills: Vec<(Skill, Importance)>,
}

impl DeveloperCandidate {
    pub fn level_of(&self, skill_id: Uuid) -> Option<Level> {
        self.skills
            .iter()
            .find(|(skill, _)| skill.id == skill_id)
            .map(|(_, level)| *level)
    }
}

impl CompanyCandidate {
    pub fn importance_of(&self, skill_id: Uuid) -> Option<Importance> {
        self.skills
            .iter()
            .find(|(skill, _)| skill.id == skill_id)
            .map(|(_, importance)| *importance)
    }
}

/// Public profile fields a caller needs to render a match card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum CandidateSummary {
    Developer {
        display_name: String,
        avatar_url: Option<String>,
        headline: Option<String>,
        availability: Option<Availability>,
        hourly_rate: Option<i32>,
        country: Option<String>,
    },
    Company {
        display_name: String,
        avatar_url: Option<String>,
        industry: Option<String>,
        work_style: Option<WorkStyle>,
        size: Option<CompanySize>,
        team_size: Option<i32>,
    },
}

impl From<&DeveloperCandidate> for CandidateSummary {
    fn from(dev: &DeveloperCandidate) -> Self {
        CandidateSummary::Developer {
            display_name: dev.display_name.clone(),
            avatar_url: dev.avatar_url.clone(),
            headline: dev.headline.clone(),
            availability: dev.availability,
            hourly_rate: dev.hourly_rate,
            country: dev.country.clone(),
        }
    }
}

impl From<&CompanyCandidate> for CandidateSummary {
    fn from(company: &CompanyCandidate) -> Self {
        CandidateSummary::Company {
            display_name: company.display_name.clone(),
            avatar_url: company.avatar_url.clone(),
            industry: company.industry.clone(),
            work_style: company.work_style,
            size: company.size,
            team_size: company.team_size,
        }
    }
}

/// Groups pool skill rows by owner, dropping rows whose tag does not parse.
fn group_skills<T>(
    rows: Vec<OwnedSkillRow>,
    parse: impl Fn(&str) -> Option<T>,
) -> HashMap<Uuid, Vec<(Skill, T)>> {
    let mut grouped: HashMap<Uuid, Vec<(Skill, T)>> = HashMap::new();
    for row in rows {
        let Some(tag) = parse(&row.tag) else {
            warn!(
                "Dropping skill {} for {}: unknown tag '{}'",
                row.slug, row.owner_id, row.tag
            );
            continue;
        };
        grouped.entry(row.owner_id).or_default().push((
            Skill {
                id: row.skill_id,
                slug: row.slug,
                label: row.label,
            },
            tag,
        ));
    }
    grouped
}

/// Joins developer profile rows with their skill rows, preserving profile order.
pub fn assemble_developers(
    profiles: Vec<DeveloperProfileRow>,
    skill_rows: Vec<OwnedSkillRow>,
) -> Vec<DeveloperCandidate> {
    let mut skills = group_skills(skill_rows, Level::parse);
    profiles
        .into_iter()
        .map(|row| DeveloperCandidate {
            availability: row.availability.as_deref().and_then(Availability::parse),
            skills: skills.remove(&row.id).unwrap_or_default(),
            id: row.id,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            headline: row.headline,
            hourly_rate: row.hourly_rate,
            country: row.country,
            created_at: row.created_at,
        })
        .collect()
}

/// Joins company profile rows with their skill rows, preserving profile order.
pub fn assemble_companies(
    profiles: Vec<CompanyProfileRow>,
    skill_rows: Vec<OwnedSkillRow>,
) -> Vec<CompanyCandidate> {
    let mut skills = group_skills(skill_rows, Importance::parse);
    profiles
        .into_iter()
        .map(|row| CompanyCandidate {
            size: row.size.as_deref().and_then(CompanySize::parse),
            work_style: row.work_style.as_deref().and_then(WorkStyle::parse),
            skills: skills.remove(&row.id).unwrap_or_default(),
            id: row.id,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            industry: row.industry,
            team_size: row.team_size,
            created_at: row.created_at,
        })
        .collect()
}
