//! Test doubles for the matching engine.
//!
//! - [`InMemoryStore`]: a `MatchStore` backed by plain vectors, with switches
//!   for failure, latency and a pool that ignores the skill filter.
//! - `skill` / `developer` / `company`: fixture constructors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::matching::candidate::{CompanyCandidate, DeveloperCandidate};
use crate::matching::store::{MatchStore, RequesterRole};
use crate::matching::tags::{Availability, Importance, Level};
use crate::models::skill::{Skill, SkillRelationRow};

pub fn skill(slug: &str) -> Skill {
    Skill {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        label: slug.to_uppercase(),
    }
}

pub fn developer(
    name: &str,
    availability: Option<Availability>,
    skills: Vec<(Skill, Level)>,
) -> DeveloperCandidate {
    DeveloperCandidate {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        avatar_url: None,
        headline: None,
        availability,
        hourly_rate: None,
        country: None,
        created_at: Utc::now(),
        skills,
    }
}

pub fn company(
    name: &str,
    industry: Option<&str>,
    skills: Vec<(Skill, Importance)>,
) -> CompanyCandidate {
    CompanyCandidate {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        avatar_url: None,
        industry: industry.map(str::to_string),
        size: None,
        work_style: None,
        team_size: None,
        created_at: Utc::now(),
        skills,
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    requesters: HashMap<(RequesterRole, Uuid), Vec<SkillRelationRow>>,
    developers: Vec<DeveloperCandidate>,
    companies: Vec<CompanyCandidate>,
    catalog: Vec<Skill>,
    pool_fetches: Arc<AtomicUsize>,
    ignore_skill_filter: bool,
    fail_pool: bool,
    fail_catalog: bool,
    pool_delay: Option<Duration>,
}

impl InMemoryStore {
    pub fn with_requester(
        mut self,
        role: RequesterRole,
        id: Uuid,
        skills: Vec<(Skill, &str)>,
    ) -> Self {
        let rows = skills
            .into_iter()
            .map(|(skill, tag)| SkillRelationRow {
                skill_id: skill.id,
                slug: skill.slug,
                label: skill.label,
                tag: tag.to_string(),
            })
            .collect();
        self.requesters.insert((role, id), rows);
        self
    }

    pub fn with_developers(mut self, developers: Vec<DeveloperCandidate>) -> Self {
        self.developers = developers;
        self
    }

    pub fn with_companies(mut self, companies: Vec<CompanyCandidate>) -> Self {
        self.companies = companies;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<Skill>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Return every candidate regardless of overlap.
    pub fn leaky_pool(mut self) -> Self {
        self.ignore_skill_filter = true;
        self
    }

    pub fn failing_pool(mut self) -> Self {
        self.fail_pool = true;
        self
    }

    pub fn failing_catalog(mut self) -> Self {
        self.fail_catalog = true;
        self
    }

    pub fn slow_pool(mut self, delay: Duration) -> Self {
        self.pool_delay = Some(delay);
        self
    }

    /// Counter of pool fetches, shared with the store.
    pub fn pool_fetches(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.pool_fetches)
    }

    async fn before_pool_fetch(&self) -> Result<()> {
        self.pool_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.pool_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_pool {
            return Err(anyhow!("connection reset by peer"));
        }
        Ok(())
    }

    fn overlaps(&self, mut skills: impl Iterator<Item = Uuid>, wanted: &[Uuid]) -> bool {
        self.ignore_skill_filter || skills.any(|id| wanted.contains(&id))
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn requester_skills(
        &self,
        role: RequesterRole,
        requester_id: Uuid,
    ) -> Result<Option<Vec<SkillRelationRow>>> {
        Ok(self.requesters.get(&(role, requester_id)).cloned())
    }

    async fn developer_pool(&self, skill_ids: &[Uuid]) -> Result<Vec<DeveloperCandidate>> {
        self.before_pool_fetch().await?;
        Ok(self
            .developers
            .iter()
            .filter(|d| self.overlaps(d.skills.iter().map(|(s, _)| s.id), skill_ids))
            .cloned()
            .collect())
    }

    async fn company_pool(&self, skill_ids: &[Uuid]) -> Result<Vec<CompanyCandidate>> {
        self.before_pool_fetch().await?;
        Ok(self
            .companies
            .iter()
            .filter(|c| self.overlaps(c.skills.iter().map(|(s, _)| s.id), skill_ids))
            .cloned()
            .collect())
    }

    async fn skill_catalog(&self) -> Result<Vec<Skill>> {
        if self.fail_catalog {
            return Err(anyhow!("relation \"skills\" is locked"));
        }
        Ok(self.catalog.clone())
    }
}
