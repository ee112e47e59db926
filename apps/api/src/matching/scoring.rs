//! Score calculator: one pure function per direction, parameterised by a
//! [`ScoringProfile`].
//!
//! Company/project → developer:
//!   skill coverage + importance of matched requirements + availability
//!   (+ bucketed rate) + experience of matched skills.
//! Developer → company:
//!   lenient skill coverage + company importance of matched skills + culture fit.
//!
//! `match_percentage` is always `matched / requester_skill_count`, independent
//! of the coverage rule used for the skill sub-score.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::candidate::{CandidateSummary, CompanyCandidate, DeveloperCandidate};
use crate::matching::extractor::{SkillPossession, SkillRequirement};
use crate::matching::profile::{Coverage, Direction, ScoringProfile};
use crate::matching::tags::{Availability, Importance, Level};
use crate::models::skill::Skill;

/// Sub-scores. Dimensions the direction does not compute are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubScores {
    pub total: u32,
    pub skill: u32,
    pub importance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<u32>,
}

/// Raw counts and flags the sub-scores were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MatchSignals {
    pub matched_count: usize,
    pub requester_skill_count: usize,
    pub required_matches: u32,
    pub preferred_matches: u32,
    pub nice_to_have_matches: u32,
    pub expert_matches: u32,
    pub advanced_matches: u32,
    pub intermediate_matches: u32,
    pub availability: Option<Availability>,
    pub flexible_work: bool,
    pub industry: Option<String>,
    /// Rate sub-score computed and at its maximum.
    pub rate_at_max: bool,
}

impl MatchSignals {
    fn count_importance(&mut self, importance: Importance) {
        match importance {
            Importance::Required => self.required_matches += 1,
            Importance::Preferred => self.preferred_matches += 1,
            Importance::NiceToHave => self.nice_to_have_matches += 1,
        }
    }

    fn count_level(&mut self, level: Level) {
        match level {
            Level::Expert => self.expert_matches += 1,
            Level::Advanced => self.advanced_matches += 1,
            Level::Intermediate => self.intermediate_matches += 1,
            Level::Beginner => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub direction: Direction,
    pub scores: SubScores,
    pub signals: MatchSignals,
    pub match_percentage: u32,
}

/// A candidate after scoring, before ranking and reason generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate_id: Uuid,
    pub candidate: CandidateSummary,
    pub breakdown: ScoreBreakdown,
    /// Requester skills the candidate shares, in requester order.
    pub matched_skills: Vec<Skill>,
}

/// Scores one developer against a company's or project's requirements.
pub fn score_developer(
    profile: &ScoringProfile,
    requirements: &[SkillRequirement],
    developer: &DeveloperCandidate,
) -> ScoredCandidate {
    let weights = &profile.weights;
    let mut signals = MatchSignals {
        requester_skill_count: requirements.len(),
        availability: developer.availability,
        ..MatchSignals::default()
    };
    let mut matched_skills = Vec::new();
    let mut importance_points: u32 = 0;
    let mut experience_points: u32 = 0;

    for requirement in requirements {
        let Some(level) = developer.level_of(requirement.skill.id) else {
            continue;
        };
        matched_skills.push(requirement.skill.clone());
        signals.count_importance(requirement.importance);
        signals.count_level(level);
        importance_points = importance_points
            .saturating_add(profile.importance_points.points(requirement.importance));
        experience_points = experience_points.saturating_add(profile.level_points.points(level));
    }
    signals.matched_count = matched_skills.len();

    let rate = (weights.rate > 0).then(|| {
        profile
            .rate_points
            .points(developer.hourly_rate)
            .min(weights.rate)
    });
    signals.rate_at_max = rate == Some(weights.rate);

    let scores = finish(SubScores {
        skill: coverage_score(
            profile.coverage,
            weights.skill,
            signals.matched_count,
            signals.requester_skill_count,
        ),
        importance: importance_points.min(weights.importance),
        availability: Some(
            profile
                .availability_points
                .points(developer.availability)
                .min(weights.availability),
        ),
        rate,
        experience: Some(experience_points.min(weights.experience)),
        ..SubScores::default()
    });

    ScoredCandidate {
        candidate_id: developer.id,
        candidate: CandidateSummary::from(developer),
        breakdown: ScoreBreakdown {
            direction: Direction::DeveloperFit,
            scores,
            match_percentage: match_percentage(
                signals.matched_count,
                signals.requester_skill_count,
            ),
            signals,
        },
        matched_skills,
    }
}

/// Scores one company against a developer's possessed skills.
pub fn score_company(
    profile: &ScoringProfile,
    possessions: &[SkillPossession],
    company: &CompanyCandidate,
) -> ScoredCandidate {
    let weights = &profile.weights;
    let flexible_work = company.work_style.is_some_and(|ws| ws.is_flexible());
    let mut signals = MatchSignals {
        requester_skill_count: possessions.len(),
        flexible_work,
        industry: company.industry.clone().filter(|i| !i.trim().is_empty()),
        ..MatchSignals::default()
    };
    let mut matched_skills = Vec::new();
    let mut importance_points: u32 = 0;

    for possession in possessions {
        let Some(importance) = company.importance_of(possession.skill.id) else {
            continue;
        };
        matched_skills.push(possession.skill.clone());
        signals.count_importance(importance);
        signals.count_level(possession.level);
        importance_points =
            importance_points.saturating_add(profile.importance_points.points(importance));
    }
    signals.matched_count = matched_skills.len();

    let culture_points = &profile.culture_points;
    let mut culture = culture_points.base;
    if flexible_work {
        culture = culture.saturating_add(culture_points.flexible_work_bonus);
    }
    if company.size.is_some_and(|size| size.is_early_stage()) {
        culture = culture.saturating_add(culture_points.early_stage_bonus);
    }

    let scores = finish(SubScores {
        skill: coverage_score(
            profile.coverage,
            weights.skill,
            signals.matched_count,
            signals.requester_skill_count,
        ),
        importance: importance_points.min(weights.importance),
        culture: Some(culture.min(weights.culture)),
        ..SubScores::default()
    });

    ScoredCandidate {
        candidate_id: company.id,
        candidate: CandidateSummary::from(company),
        breakdown: ScoreBreakdown {
            direction: Direction::CompanyFit,
            scores,
            match_percentage: match_percentage(
                signals.matched_count,
                signals.requester_skill_count,
            ),
            signals,
        },
        matched_skills,
    }
}

fn coverage_score(coverage: Coverage, weight: u32, matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let matched = matched as f64;
    let total = total as f64;
    let ratio = match coverage {
        Coverage::Exact => matched / total,
        Coverage::Lenient { threshold } => (matched / (total * threshold).max(1.0)).min(1.0),
    };
    ((ratio * weight as f64).round() as u32).min(weight)
}

/// Literal overlap ratio, 0 – 100.
pub fn match_percentage(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((matched as f64 / total as f64 * 100.0).round() as u32).min(100)
}

fn finish(mut scores: SubScores) -> SubScores {
    let optional = [
        scores.availability,
        scores.rate,
        scores.experience,
        scores.culture,
    ];
    let total = optional
        .iter()
        .flatten()
        .fold(scores.skill.saturating_add(scores.importance), |acc, s| {
            acc.saturating_add(*s)
        });
    scores.total = total.min(100);
    scores
}
