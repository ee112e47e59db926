//! Scoring profiles: the weight tables that parameterise the single score calculator.
//!
//! Three profiles ship built in:
//! - `developer_profile_match`: company → developer (35 / 25 / 25 / 15)
//! - `company_match`: developer → company (40 / 35 / 25 culture)
//! - `project_match`: project → developer (40 / 25 availability / 20 rate / 15)
//!
//! Any of them can be replaced at startup from a JSON file, so weight changes
//! are configuration rather than code forks.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::tags::{Availability, Importance, Level};

/// Which side is being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// A company or project scoring developer candidates.
    DeveloperFit,
    /// A developer scoring company candidates.
    CompanyFit,
}

/// Maximum points per dimension. Dimensions a direction never computes must be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Weights {
    pub skill: u32,
    pub importance: u32,
    pub availability: u32,
    pub rate: u32,
    pub experience: u32,
    pub culture: u32,
}

impl Weights {
    pub fn sum(&self) -> u32 {
        [
            self.skill,
            self.importance,
            self.availability,
            self.rate,
            self.experience,
            self.culture,
        ]
        .into_iter()
        .fold(0, u32::saturating_add)
    }
}

/// How matched-skill coverage turns into the skill sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coverage {
    /// `matched / requester_skill_count`.
    Exact,
    /// `min(1, matched / max(1, requester_skill_count * threshold))`.
    Lenient { threshold: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportancePoints {
    pub required: u32,
    pub preferred: u32,
    pub nice_to_have: u32,
}

impl ImportancePoints {
    pub fn points(&self, importance: Importance) -> u32 {
        match importance {
            Importance::Required => self.required,
            Importance::Preferred => self.preferred,
            Importance::NiceToHave => self.nice_to_have,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPoints {
    pub beginner: u32,
    pub intermediate: u32,
    pub advanced: u32,
    pub expert: u32,
}

impl LevelPoints {
    pub fn points(&self, level: Level) -> u32 {
        match level {
            Level::Beginner => self.beginner,
            Level::Intermediate => self.intermediate,
            Level::Advanced => self.advanced,
            Level::Expert => self.expert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityPoints {
    pub available: u32,
    pub busy: u32,
    pub unavailable: u32,
    pub unset: u32,
}

impl AvailabilityPoints {
    pub fn points(&self, availability: Option<Availability>) -> u32 {
        match availability {
            Some(Availability::Available) => self.available,
            Some(Availability::Busy) => self.busy,
            Some(Availability::Unavailable) => self.unavailable,
            None => self.unset,
        }
    }
}

/// A rate at or below `max_rate` earns `points`. Bands are checked in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBand {
    pub max_rate: i32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoints {
    pub bands: Vec<RateBand>,
    /// Rate above every band.
    pub above: u32,
    pub unset: u32,
}

impl RatePoints {
    pub fn points(&self, hourly_rate: Option<i32>) -> u32 {
        let Some(rate) = hourly_rate else {
            return self.unset;
        };
        self.bands
            .iter()
            .find(|band| rate <= band.max_rate)
            .map(|band| band.points)
            .unwrap_or(self.above)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturePoints {
    pub base: u32,
    pub flexible_work_bonus: u32,
    pub early_stage_bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub name: String,
    pub direction: Direction,
    pub weights: Weights,
    pub coverage: Coverage,
    pub importance_points: ImportancePoints,
    pub level_points: LevelPoints,
    pub availability_points: AvailabilityPoints,
    pub rate_points: RatePoints,
    pub culture_points: CulturePoints,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("profile '{name}': weights sum to {sum}, expected 100")]
    WeightSum { name: String, sum: u32 },

    #[error("profile '{name}': {dimension} weight is not used by the {direction:?} direction")]
    UnusedDimension {
        name: String,
        dimension: &'static str,
        direction: Direction,
    },

    #[error("profile '{name}': lenient coverage threshold must be in (0, 1], got {threshold}")]
    Threshold { name: String, threshold: f64 },

    #[error("profile '{name}': {dimension} awards {points} points, more than its weight {weight}")]
    PointsExceedWeight {
        name: String,
        dimension: &'static str,
        points: u32,
        weight: u32,
    },

    #[error("profile '{name}' is configured for {found:?}, expected {expected:?}")]
    WrongDirection {
        name: String,
        expected: Direction,
        found: Direction,
    },
}

const DEFAULT_IMPORTANCE_POINTS: ImportancePoints = ImportancePoints {
    required: 8,
    preferred: 5,
    nice_to_have: 2,
};

const DEFAULT_LEVEL_POINTS: LevelPoints = LevelPoints {
    beginner: 0,
    intermediate: 2,
    advanced: 3,
    expert: 5,
};

const DEFAULT_AVAILABILITY_POINTS: AvailabilityPoints = AvailabilityPoints {
    available: 25,
    busy: 15,
    unavailable: 5,
    unset: 10,
};

const DEFAULT_CULTURE_POINTS: CulturePoints = CulturePoints {
    base: 15,
    flexible_work_bonus: 5,
    early_stage_bonus: 5,
};

fn default_rate_points() -> RatePoints {
    RatePoints {
        bands: vec![
            RateBand { max_rate: 50, points: 20 },
            RateBand { max_rate: 80, points: 15 },
            RateBand { max_rate: 120, points: 10 },
        ],
        above: 5,
        unset: 10,
    }
}

impl ScoringProfile {
    /// Company looking at developer profiles.
    pub fn developer_profile_match() -> Self {
        Self {
            name: "developer_profile_match".to_string(),
            direction: Direction::DeveloperFit,
            weights: Weights {
                skill: 35,
                importance: 25,
                availability: 25,
                experience: 15,
                ..Weights::default()
            },
            coverage: Coverage::Exact,
            importance_points: DEFAULT_IMPORTANCE_POINTS,
            level_points: DEFAULT_LEVEL_POINTS,
            availability_points: DEFAULT_AVAILABILITY_POINTS,
            rate_points: default_rate_points(),
            culture_points: DEFAULT_CULTURE_POINTS,
        }
    }

    /// Developer looking at companies. Coverage is lenient: ~70% of the
    /// developer's own skills earns the full skill bonus.
    pub fn company_match() -> Self {
        Self {
            name: "company_match".to_string(),
            direction: Direction::CompanyFit,
            weights: Weights {
                skill: 40,
                importance: 35,
                culture: 25,
                ..Weights::default()
            },
            coverage: Coverage::Lenient { threshold: 0.7 },
            importance_points: ImportancePoints {
                required: 10,
                preferred: 7,
                nice_to_have: 3,
            },
            level_points: DEFAULT_LEVEL_POINTS,
            availability_points: DEFAULT_AVAILABILITY_POINTS,
            rate_points: default_rate_points(),
            culture_points: DEFAULT_CULTURE_POINTS,
        }
    }

    /// Project looking at developers; trades importance for a bucketed rate score.
    pub fn project_match() -> Self {
        Self {
            name: "project_match".to_string(),
            direction: Direction::DeveloperFit,
            weights: Weights {
                skill: 40,
                availability: 25,
                rate: 20,
                experience: 15,
                ..Weights::default()
            },
            coverage: Coverage::Exact,
            importance_points: DEFAULT_IMPORTANCE_POINTS,
            level_points: DEFAULT_LEVEL_POINTS,
            availability_points: DEFAULT_AVAILABILITY_POINTS,
            rate_points: default_rate_points(),
            culture_points: DEFAULT_CULTURE_POINTS,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let sum = self.weights.sum();
        if sum != 100 {
            return Err(ProfileError::WeightSum {
                name: self.name.clone(),
                sum,
            });
        }

        let unused: Vec<(&'static str, u32)> = match self.direction {
            Direction::DeveloperFit => vec![("culture", self.weights.culture)],
            Direction::CompanyFit => vec![
                ("availability", self.weights.availability),
                ("rate", self.weights.rate),
                ("experience", self.weights.experience),
            ],
        };
        if let Some(&(dimension, _)) = unused.iter().find(|(_, weight)| *weight > 0) {
            return Err(ProfileError::UnusedDimension {
                name: self.name.clone(),
                dimension,
                direction: self.direction,
            });
        }

        if let Coverage::Lenient { threshold } = self.coverage {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(ProfileError::Threshold {
                    name: self.name.clone(),
                    threshold,
                });
            }
        }

        self.check_points()
    }

    /// A single award may not exceed its dimension's weight. Dimensions with a
    /// zero weight are ignored since their sub-score is always capped to zero.
    fn check_points(&self) -> Result<(), ProfileError> {
        let w = &self.weights;
        let imp = &self.importance_points;
        let lvl = &self.level_points;
        let avail = &self.availability_points;
        let rate = &self.rate_points;
        let culture = &self.culture_points;

        let mut awards: Vec<(&'static str, u32, u32)> = vec![
            ("importance", imp.required.max(imp.preferred).max(imp.nice_to_have), w.importance),
            (
                "experience",
                lvl.beginner.max(lvl.intermediate).max(lvl.advanced).max(lvl.expert),
                w.experience,
            ),
            (
                "availability",
                avail.available.max(avail.busy).max(avail.unavailable).max(avail.unset),
                w.availability,
            ),
            ("rate", rate.above.max(rate.unset), w.rate),
            (
                "culture",
                culture
                    .base
                    .saturating_add(culture.flexible_work_bonus)
                    .saturating_add(culture.early_stage_bonus),
                w.culture,
            ),
        ];
        awards.extend(rate.bands.iter().map(|band| ("rate", band.points, w.rate)));

        match awards
            .into_iter()
            .find(|&(_, points, weight)| weight > 0 && points > weight)
        {
            Some((dimension, points, weight)) => Err(ProfileError::PointsExceedWeight {
                name: self.name.clone(),
                dimension,
                points,
                weight,
            }),
            None => Ok(()),
        }
    }

    fn expect_direction(&self, expected: Direction) -> Result<(), ProfileError> {
        if self.direction != expected {
            return Err(ProfileError::WrongDirection {
                name: self.name.clone(),
                expected,
                found: self.direction,
            });
        }
        Ok(())
    }
}

/// The active profile for each matching context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfiles {
    pub developer_profile_match: ScoringProfile,
    pub company_match: ScoringProfile,
    pub project_match: ScoringProfile,
}

impl Default for ScoringProfiles {
    fn default() -> Self {
        Self {
            developer_profile_match: ScoringProfile::developer_profile_match(),
            company_match: ScoringProfile::company_match(),
            project_match: ScoringProfile::project_match(),
        }
    }
}

impl ScoringProfiles {
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.developer_profile_match.validate()?;
        self.developer_profile_match
            .expect_direction(Direction::DeveloperFit)?;
        self.company_match.validate()?;
        self.company_match.expect_direction(Direction::CompanyFit)?;
        self.project_match.validate()?;
        self.project_match.expect_direction(Direction::DeveloperFit)?;
        Ok(())
    }

    /// Loads and validates profiles from a JSON file, or returns the built-ins.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let profiles = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read scoring profiles from {}", path.display()))?;
                serde_json::from_str::<ScoringProfiles>(&raw)
                    .with_context(|| format!("Invalid scoring profiles JSON in {}", path.display()))?
            }
            None => ScoringProfiles::default(),
        };
        profiles.validate()?;
        Ok(profiles)
    }
}
