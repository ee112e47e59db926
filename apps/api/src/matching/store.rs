//! Data-layer seam for the matching engine.
//!
//! The engine only ever sees plain values through `MatchStore`; identity,
//! sessions and SQL stay on this side of the trait. `PgMatchStore` is the
//! production backend, carried in `AppState` as `Arc<dyn MatchStore>`.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::matching::candidate::{
    assemble_companies, assemble_developers, CompanyCandidate, DeveloperCandidate,
};
use crate::models::profile::{CompanyProfileRow, DeveloperProfileRow};
use crate::models::skill::{OwnedSkillRow, Skill, SkillRelationRow};

/// Who a match list is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequesterRole {
    Company,
    Developer,
    Project,
}

impl RequesterRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "company" => Some(Self::Company),
            "developer" => Some(Self::Developer),
            "project" => Some(Self::Project),
            _ => None,
        }
    }
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Raw skill relationship rows for a requester.
    /// `None` means the requester does not exist; `Some(vec![])` means it has no skills.
    async fn requester_skills(
        &self,
        role: RequesterRole,
        requester_id: Uuid,
    ) -> Result<Option<Vec<SkillRelationRow>>>;

    /// Every developer holding at least one of `skill_ids`, with full skill sets.
    async fn developer_pool(&self, skill_ids: &[Uuid]) -> Result<Vec<DeveloperCandidate>>;

    /// Every company requiring at least one of `skill_ids`, with full skill sets.
    async fn company_pool(&self, skill_ids: &[Uuid]) -> Result<Vec<CompanyCandidate>>;

    async fn skill_catalog(&self) -> Result<Vec<Skill>>;
}

pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, table: &str, id: Uuid) -> Result<bool> {
        let query = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)");
        Ok(sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn requester_skills(
        &self,
        role: RequesterRole,
        requester_id: Uuid,
    ) -> Result<Option<Vec<SkillRelationRow>>> {
        let (table, query) = match role {
            RequesterRole::Company => (
                "company_profiles",
                r#"
                SELECT s.id AS skill_id, s.slug, s.label, cs.importance AS tag
                FROM company_skills cs
                JOIN skills s ON s.id = cs.skill_id
                WHERE cs.company_id = $1
                ORDER BY cs.created_at, s.slug
                "#,
            ),
            RequesterRole::Developer => (
                "developer_profiles",
                r#"
                SELECT s.id AS skill_id, s.slug, s.label, ds.level AS tag
                FROM developer_skills ds
                JOIN skills s ON s.id = ds.skill_id
                WHERE ds.developer_id = $1
                ORDER BY ds.created_at, s.slug
                "#,
            ),
            RequesterRole::Project => (
                "projects",
                r#"
                SELECT s.id AS skill_id, s.slug, s.label, ps.importance AS tag
                FROM project_skills ps
                JOIN skills s ON s.id = ps.skill_id
                WHERE ps.project_id = $1
                ORDER BY ps.created_at, s.slug
                "#,
            ),
        };

        if !self.exists(table, requester_id).await? {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, SkillRelationRow>(query)
            .bind(requester_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(Some(rows))
    }

    async fn developer_pool(&self, skill_ids: &[Uuid]) -> Result<Vec<DeveloperCandidate>> {
        // Inclusive OR join: any shared skill admits the developer.
        let profiles = sqlx::query_as::<_, DeveloperProfileRow>(
            r#"
            SELECT d.id, d.display_name, d.avatar_url, d.headline, d.availability,
                   d.hourly_rate, d.country, d.created_at
            FROM developer_profiles d
            WHERE EXISTS (
                SELECT 1 FROM developer_skills ds
                WHERE ds.developer_id = d.id AND ds.skill_id = ANY($1)
            )
            ORDER BY d.created_at, d.id
            "#,
        )
        .bind(skill_ids)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = profiles.iter().map(|p| p.id).collect();
        let skills = sqlx::query_as::<_, OwnedSkillRow>(
            r#"
            SELECT ds.developer_id AS owner_id, s.id AS skill_id, s.slug, s.label, ds.level AS tag
            FROM developer_skills ds
            JOIN skills s ON s.id = ds.skill_id
            WHERE ds.developer_id = ANY($1)
            ORDER BY ds.created_at, s.slug
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble_developers(profiles, skills))
    }

    async fn company_pool(&self, skill_ids: &[Uuid]) -> Result<Vec<CompanyCandidate>> {
        let profiles = sqlx::query_as::<_, CompanyProfileRow>(
            r#"
            SELECT c.id, c.display_name, c.avatar_url, c.industry, c.size, c.work_style,
                   c.team_size, c.created_at
            FROM company_profiles c
            WHERE EXISTS (
                SELECT 1 FROM company_skills cs
                WHERE cs.company_id = c.id AND cs.skill_id = ANY($1)
            )
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(skill_ids)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = profiles.iter().map(|p| p.id).collect();
        let skills = sqlx::query_as::<_, OwnedSkillRow>(
            r#"
            SELECT cs.company_id AS owner_id, s.id AS skill_id, s.slug, s.label, cs.importance AS tag
            FROM company_skills cs
            JOIN skills s ON s.id = cs.skill_id
            WHERE cs.company_id = ANY($1)
            ORDER BY cs.created_at, s.slug
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble_companies(profiles, skills))
    }

    async fn skill_catalog(&self) -> Result<Vec<Skill>> {
        Ok(
            sqlx::query_as::<_, Skill>("SELECT id, slug, label FROM skills ORDER BY label")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}
