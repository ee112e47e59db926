//! Match engine. Orchestrates extraction, pool loading, scoring, ranking and
//! reason generation for one request.
//!
//! Flow: requester_skills → extract → (empty? guidance message) →
//!       pool fetch under timeout → score each candidate → rank → reasons.
//!
//! Stateless apart from configuration; every call recomputes from the store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::matching::candidate::CandidateSummary;
use crate::matching::extractor::{
    extract_possessions, extract_requirements, Extraction, RequesterSkills,
};
use crate::matching::profile::{ScoringProfile, ScoringProfiles};
use crate::matching::ranker::rank;
use crate::matching::reason::recommendation_reason;
use crate::matching::scoring::{score_company, score_developer, ScoredCandidate, SubScores};
use crate::matching::store::{MatchStore, RequesterRole};
use crate::models::skill::{Skill, SkillRelationRow};

pub const NO_REQUIREMENTS_MESSAGE: &str =
    "No skill requirements defined yet. Add required skills to see matching developers.";
pub const NO_SKILLS_MESSAGE: &str =
    "No skills defined yet. Add your skills to see matching companies.";

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(#[source] anyhow::Error),

    #[error("Candidate pool fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Opposite-role population to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateRole {
    Developers,
    Companies,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: Uuid,
    pub candidate: CandidateSummary,
    pub scores: SubScores,
    pub matched_skills: Vec<Skill>,
    pub total_skill_count: usize,
    pub match_percentage: u32,
    pub recommendation_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
    pub total_matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MatchResponse {
    fn guidance(message: &str) -> Self {
        Self {
            matches: vec![],
            total_matches: 0,
            message: Some(message.to_string()),
        }
    }
}

/// One skill in an ad-hoc search, tagged with an importance (searching for
/// developers) or a level (searching for companies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSkill {
    pub skill_id: Uuid,
    pub tag: String,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchLimits {
    pub default: usize,
    pub search: usize,
    pub max: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            default: 20,
            search: 50,
            max: 50,
        }
    }
}

pub struct MatchEngine {
    store: Arc<dyn MatchStore>,
    profiles: ScoringProfiles,
    limits: MatchLimits,
    pool_timeout: Duration,
}

impl MatchEngine {
    pub fn new(
        store: Arc<dyn MatchStore>,
        profiles: ScoringProfiles,
        limits: MatchLimits,
        pool_timeout: Duration,
    ) -> Self {
        Self {
            store,
            profiles,
            limits,
            pool_timeout,
        }
    }

    pub fn profiles(&self) -> &ScoringProfiles {
        &self.profiles
    }

    /// Ranked matches for a stored requester.
    pub async fn compute_matches(
        &self,
        requester_id: Uuid,
        role: RequesterRole,
        limit: Option<usize>,
    ) -> Result<MatchResponse, MatchError> {
        if requester_id.is_nil() {
            return Err(MatchError::InvalidArgument(
                "requester_id must not be nil".to_string(),
            ));
        }
        let limit = self.resolve_limit(limit, self.limits.default)?;

        let rows = self
            .store
            .requester_skills(role, requester_id)
            .await
            .map_err(MatchError::UpstreamFailure)?
            .ok_or_else(|| {
                MatchError::InvalidArgument(format!("{role:?} {requester_id} not found"))
            })?;

        let (extraction, profile, empty_message) = match role {
            RequesterRole::Company => (
                extract_requirements(&rows),
                &self.profiles.developer_profile_match,
                NO_REQUIREMENTS_MESSAGE,
            ),
            RequesterRole::Project => (
                extract_requirements(&rows),
                &self.profiles.project_match,
                NO_REQUIREMENTS_MESSAGE,
            ),
            RequesterRole::Developer => (
                extract_possessions(&rows),
                &self.profiles.company_match,
                NO_SKILLS_MESSAGE,
            ),
        };

        let skills = match extraction {
            Extraction::Ready(skills) => skills,
            Extraction::Empty => {
                info!("{role:?} {requester_id} has no usable skills; skipping pool fetch");
                return Ok(MatchResponse::guidance(empty_message));
            }
        };

        let response = self.run(profile, skills, limit).await?;
        info!(
            "Computed {} of {} matches for {role:?} {requester_id} using '{}'",
            response.matches.len(),
            response.total_matches,
            profile.name
        );
        Ok(response)
    }

    /// Ranked matches for a requirement set supplied with the request rather
    /// than loaded from a stored requester.
    pub async fn search(
        &self,
        target: CandidateRole,
        skills: &[SearchSkill],
        limit: Option<usize>,
    ) -> Result<MatchResponse, MatchError> {
        if skills.is_empty() {
            return Err(MatchError::InvalidArgument(
                "search needs at least one skill".to_string(),
            ));
        }
        let limit = self.resolve_limit(limit, self.limits.search)?;

        let catalog: HashMap<Uuid, Skill> = self
            .store
            .skill_catalog()
            .await
            .map_err(MatchError::UpstreamFailure)?
            .into_iter()
            .map(|skill| (skill.id, skill))
            .collect();

        let rows = skills
            .iter()
            .map(|s| -> Result<SkillRelationRow, MatchError> {
                let skill = catalog.get(&s.skill_id).ok_or_else(|| {
                    MatchError::InvalidArgument(format!("unknown skill {}", s.skill_id))
                })?;
                Ok(SkillRelationRow {
                    skill_id: skill.id,
                    slug: skill.slug.clone(),
                    label: skill.label.clone(),
                    tag: s.tag.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (extraction, profile) = match target {
            CandidateRole::Developers => (
                extract_requirements(&rows),
                &self.profiles.developer_profile_match,
            ),
            CandidateRole::Companies => {
                (extract_possessions(&rows), &self.profiles.company_match)
            }
        };

        match extraction {
            Extraction::Ready(skills) => self.run(profile, skills, limit).await,
            Extraction::Empty => Err(MatchError::InvalidArgument(
                "no search skill carried a recognised tag".to_string(),
            )),
        }
    }

    async fn run(
        &self,
        profile: &ScoringProfile,
        skills: RequesterSkills,
        limit: usize,
    ) -> Result<MatchResponse, MatchError> {
        let skill_ids = skills.skill_ids();
        let total_skill_count = skill_ids.len();

        let scored: Vec<ScoredCandidate> = match &skills {
            RequesterSkills::Requirements(requirements) => {
                let pool = self.with_timeout(self.store.developer_pool(&skill_ids)).await?;
                pool.iter()
                    .map(|dev| score_developer(profile, requirements, dev))
                    .collect()
            }
            RequesterSkills::Possessions(possessions) => {
                let pool = self.with_timeout(self.store.company_pool(&skill_ids)).await?;
                pool.iter()
                    .map(|company| score_company(profile, possessions, company))
                    .collect()
            }
        };

        let before = scored.len();
        let scored: Vec<ScoredCandidate> = scored
            .into_iter()
            .filter(|s| !s.matched_skills.is_empty())
            .collect();
        if scored.len() < before {
            debug!(
                "Dropped {} pooled candidates with no overlapping skills",
                before - scored.len()
            );
        }

        let (ranked, total_matches) = rank(scored, limit);
        let matches = ranked
            .into_iter()
            .map(|s| MatchResult {
                recommendation_reason: recommendation_reason(&s.breakdown),
                candidate_id: s.candidate_id,
                candidate: s.candidate,
                scores: s.breakdown.scores,
                matched_skills: s.matched_skills,
                total_skill_count,
                match_percentage: s.breakdown.match_percentage,
            })
            .collect();

        Ok(MatchResponse {
            matches,
            total_matches,
            message: None,
        })
    }

    async fn with_timeout<T>(
        &self,
        fetch: impl std::future::Future<Output = anyhow::Result<T>>,
    ) -> Result<T, MatchError> {
        tokio::time::timeout(self.pool_timeout, fetch)
            .await
            .map_err(|_| MatchError::Timeout(self.pool_timeout))?
            .map_err(MatchError::UpstreamFailure)
    }

    fn resolve_limit(&self, requested: Option<usize>, default: usize) -> Result<usize, MatchError> {
        match requested {
            Some(0) => Err(MatchError::InvalidArgument(
                "limit must be greater than zero".to_string(),
            )),
            Some(n) => Ok(n.min(self.limits.max)),
            None => Ok(default.min(self.limits.max)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::tags::{Availability, Importance, Level};
    use crate::testing::{company, developer, skill, InMemoryStore};

    fn engine(store: InMemoryStore) -> MatchEngine {
        MatchEngine::new(
            Arc::new(store),
            ScoringProfiles::default(),
            MatchLimits::default(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_company_scenario_ranks_a_above_b() {
        let react = skill("react");
        let aws = skill("aws");
        let node = skill("node");
        let company_id = Uuid::new_v4();
        let a = developer(
            "A",
            Some(Availability::Available),
            vec![
                (react.clone(), Level::Expert),
                (aws.clone(), Level::Intermediate),
                (node.clone(), Level::Advanced),
            ],
        );
        let b = developer("B", None, vec![(react.clone(), Level::Beginner)]);
        let store = InMemoryStore::default()
            .with_requester(
                RequesterRole::Company,
                company_id,
                vec![(react.clone(), "required"), (aws.clone(), "preferred")],
            )
            .with_developers(vec![b.clone(), a.clone()]);

        let response = engine(store)
            .compute_matches(company_id, RequesterRole::Company, None)
            .await
            .unwrap();

        assert_eq!(response.total_matches, 2);
        assert!(response.message.is_none());
        assert_eq!(response.matches[0].candidate_id, a.id);
        assert_eq!(response.matches[0].scores.skill, 35);
        assert_eq!(response.matches[0].scores.importance, 13);
        assert_eq!(response.matches[0].scores.experience, Some(7));
        assert_eq!(response.matches[0].match_percentage, 100);
        assert_eq!(response.matches[0].total_skill_count, 2);
        assert_eq!(
            response.matches[0].recommendation_reason,
            "Perfect skill match, Matches 1 critical skill, Available now, 1 expert-level skill"
        );
        assert_eq!(response.matches[1].candidate_id, b.id);
        assert_eq!(response.matches[1].scores.skill, 18);
        assert_eq!(response.matches[1].scores.importance, 8);
        assert_eq!(response.matches[1].scores.experience, Some(0));
        assert_eq!(response.matches[1].matched_skills, vec![react]);
    }

    #[tokio::test]
    async fn test_empty_requirements_short_circuit_without_pool_fetch() {
        let company_id = Uuid::new_v4();
        let store = InMemoryStore::default()
            .with_requester(RequesterRole::Company, company_id, vec![])
            .with_developers(vec![developer("x", None, vec![(skill("go"), Level::Expert)])]);
        let pool_fetches = store.pool_fetches();

        let response = engine(store)
            .compute_matches(company_id, RequesterRole::Company, None)
            .await
            .unwrap();

        assert!(response.matches.is_empty());
        assert_eq!(response.total_matches, 0);
        assert_eq!(response.message.as_deref(), Some(NO_REQUIREMENTS_MESSAGE));
        assert_eq!(pool_fetches.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_developer_without_skills_gets_guidance() {
        let dev_id = Uuid::new_v4();
        let store = InMemoryStore::default().with_requester(
            RequesterRole::Developer,
            dev_id,
            vec![(skill("rust"), "grandmaster")],
        );

        let response = engine(store)
            .compute_matches(dev_id, RequesterRole::Developer, None)
            .await
            .unwrap();

        assert!(response.matches.is_empty());
        assert_eq!(response.message.as_deref(), Some(NO_SKILLS_MESSAGE));
    }

    #[tokio::test]
    async fn test_candidates_without_overlap_never_appear() {
        let rust = skill("rust");
        let company_id = Uuid::new_v4();
        let stranger = developer("stranger", None, vec![(skill("cobol"), Level::Expert)]);
        let match_dev = developer("match", None, vec![(rust.clone(), Level::Advanced)]);
        let store = InMemoryStore::default()
            .with_requester(RequesterRole::Company, company_id, vec![(rust, "required")])
            .with_developers(vec![stranger.clone(), match_dev.clone()])
            .leaky_pool();

        let response = engine(store)
            .compute_matches(company_id, RequesterRole::Company, None)
            .await
            .unwrap();

        assert_eq!(response.total_matches, 1);
        assert_eq!(response.matches[0].candidate_id, match_dev.id);
        assert!(response.matches.iter().all(|m| m.candidate_id != stranger.id));
    }

    #[tokio::test]
    async fn test_developer_direction_matches_companies() {
        let skills: Vec<Skill> = (0..10).map(|i| skill(&format!("s{i}"))).collect();
        let dev_id = Uuid::new_v4();
        let co = company(
            "Acme",
            Some("Fintech"),
            skills[..3]
                .iter()
                .map(|s| (s.clone(), Importance::Required))
                .collect(),
        );
        let store = InMemoryStore::default()
            .with_requester(
                RequesterRole::Developer,
                dev_id,
                skills.iter().map(|s| (s.clone(), "advanced")).collect(),
            )
            .with_companies(vec![co.clone()]);

        let response = engine(store)
            .compute_matches(dev_id, RequesterRole::Developer, None)
            .await
            .unwrap();

        let m = &response.matches[0];
        assert_eq!(m.candidate_id, co.id);
        assert_eq!(m.match_percentage, 30);
        assert_eq!(m.scores.skill, 17);
        assert_eq!(m.scores.importance, 30);
        assert_eq!(m.scores.culture, Some(15));
        assert_eq!(m.total_skill_count, 10);
        assert_eq!(
            m.recommendation_reason,
            "Requires 3 of your skills, Fintech industry"
        );
    }

    #[tokio::test]
    async fn test_project_requester_uses_project_profile() {
        let rust = skill("rust");
        let project_id = Uuid::new_v4();
        let mut dev = developer("cheap", Some(Availability::Available), vec![(rust.clone(), Level::Expert)]);
        dev.hourly_rate = Some(40);
        let store = InMemoryStore::default()
            .with_requester(RequesterRole::Project, project_id, vec![(rust, "required")])
            .with_developers(vec![dev]);

        let response = engine(store)
            .compute_matches(project_id, RequesterRole::Project, None)
            .await
            .unwrap();

        let scores = response.matches[0].scores;
        assert_eq!(scores.skill, 40);
        assert_eq!(scores.rate, Some(20));
        assert_eq!(scores.total, 40 + 25 + 20 + 5);
        assert!(response.matches[0]
            .recommendation_reason
            .ends_with("Rate within budget"));
    }

    #[tokio::test]
    async fn test_limit_truncates_and_clamps() {
        let rust = skill("rust");
        let company_id = Uuid::new_v4();
        let devs: Vec<_> = (0..60)
            .map(|i| developer(&format!("d{i}"), None, vec![(rust.clone(), Level::Advanced)]))
            .collect();
        let store = InMemoryStore::default()
            .with_requester(RequesterRole::Company, company_id, vec![(rust, "required")])
            .with_developers(devs.clone());
        let engine = engine(store);

        let default = engine
            .compute_matches(company_id, RequesterRole::Company, None)
            .await
            .unwrap();
        assert_eq!(default.matches.len(), 20);
        assert_eq!(default.total_matches, 60);
        // Equal scores keep pool order.
        assert_eq!(default.matches[0].candidate_id, devs[0].id);
        assert_eq!(default.matches[19].candidate_id, devs[19].id);

        let clamped = engine
            .compute_matches(company_id, RequesterRole::Company, Some(500))
            .await
            .unwrap();
        assert_eq!(clamped.matches.len(), 50);

        let zero = engine
            .compute_matches(company_id, RequesterRole::Company, Some(0))
            .await;
        assert!(matches!(zero, Err(MatchError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_nil_and_unknown_requesters_are_invalid() {
        let engine = engine(InMemoryStore::default());

        let nil = engine
            .compute_matches(Uuid::nil(), RequesterRole::Company, None)
            .await;
        assert!(matches!(nil, Err(MatchError::InvalidArgument(_))));

        let unknown = engine
            .compute_matches(Uuid::new_v4(), RequesterRole::Developer, None)
            .await;
        assert!(matches!(unknown, Err(MatchError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_pool_failure_is_upstream_failure() {
        let rust = skill("rust");
        let company_id = Uuid::new_v4();
        let store = InMemoryStore::default()
            .with_requester(RequesterRole::Company, company_id, vec![(rust.clone(), "required")])
            .with_developers(vec![developer("d", None, vec![(rust, Level::Expert)])])
            .failing_pool();

        let result = engine(store)
            .compute_matches(company_id, RequesterRole::Company, None)
            .await;

        assert!(matches!(result, Err(MatchError::UpstreamFailure(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_pool_times_out() {
        let rust = skill("rust");
        let company_id = Uuid::new_v4();
        let store = InMemoryStore::default()
            .with_requester(RequesterRole::Company, company_id, vec![(rust.clone(), "required")])
            .with_developers(vec![developer("d", None, vec![(rust, Level::Expert)])])
            .slow_pool(Duration::from_secs(60));

        let result = engine(store)
            .compute_matches(company_id, RequesterRole::Company, None)
            .await;

        assert!(matches!(result, Err(MatchError::Timeout(d)) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_search_resolves_catalog_and_uses_search_limit() {
        let rust = skill("rust");
        let devs: Vec<_> = (0..55)
            .map(|i| developer(&format!("d{i}"), None, vec![(rust.clone(), Level::Expert)]))
            .collect();
        let store = InMemoryStore::default()
            .with_catalog(vec![rust.clone()])
            .with_developers(devs);
        let engine = engine(store);

        let response = engine
            .search(
                CandidateRole::Developers,
                &[SearchSkill {
                    skill_id: rust.id,
                    tag: "required".to_string(),
                }],
                None,
            )
            .await
            .unwrap();
        assert_eq!(response.matches.len(), 50);
        assert_eq!(response.total_matches, 55);

        let unknown = engine
            .search(
                CandidateRole::Developers,
                &[SearchSkill {
                    skill_id: Uuid::new_v4(),
                    tag: "required".to_string(),
                }],
                None,
            )
            .await;
        assert!(matches!(unknown, Err(MatchError::InvalidArgument(_))));

        let empty = engine.search(CandidateRole::Companies, &[], None).await;
        assert!(matches!(empty, Err(MatchError::InvalidArgument(_))));
    }
}
