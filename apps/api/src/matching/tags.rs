//! Closed tag types attached to skill relationships and candidate profiles.
//!
//! Rows arrive from the data layer as free strings; they are parsed here once
//! so the scoring code only ever sees these enums.

use serde::{Deserialize, Serialize};

/// Company- or project-side weight tag on a required skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Required,
    Preferred,
    NiceToHave,
}

impl Importance {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "required" => Some(Self::Required),
            "preferred" => Some(Self::Preferred),
            "nice_to_have" | "nice-to-have" => Some(Self::NiceToHave),
            _ => None,
        }
    }
}

/// Developer-side proficiency tag on a possessed skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Level {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Busy,
    Unavailable,
}

impl Availability {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "busy" => Some(Self::Busy),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStyle {
    Remote,
    Hybrid,
    Onsite,
    Flexible,
}

impl WorkStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "remote" => Some(Self::Remote),
            "hybrid" => Some(Self::Hybrid),
            "onsite" | "on-site" | "office" => Some(Self::Onsite),
            "flexible" => Some(Self::Flexible),
            _ => None,
        }
    }

    /// Remote and flexible arrangements earn the culture bonus.
    pub fn is_flexible(self) -> bool {
        matches!(self, Self::Remote | Self::Flexible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "startup")]
    Startup,
    #[serde(rename = "scale-up")]
    ScaleUp,
    #[serde(rename = "midsize")]
    Midsize,
    #[serde(rename = "enterprise")]
    Enterprise,
}

impl CompanySize {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "startup" => Some(Self::Startup),
            "scale-up" | "scaleup" | "scale_up" => Some(Self::ScaleUp),
            "midsize" | "mid-size" | "sme" => Some(Self::Midsize),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    pub fn is_early_stage(self) -> bool {
        matches!(self, Self::Startup | Self::ScaleUp)
    }
}
