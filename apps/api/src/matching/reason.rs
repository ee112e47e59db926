//! Recommendation reasons: a fixed ladder of conditions over a `ScoreBreakdown`,
//! joined with ", ". Pure and deterministic; no free-form text generation.

use crate::matching::profile::Direction;
use crate::matching::scoring::ScoreBreakdown;
use crate::matching::tags::Availability;

const DEVELOPER_FALLBACK: &str = "Potential match";
const COMPANY_FALLBACK: &str = "Good potential match";

pub fn recommendation_reason(breakdown: &ScoreBreakdown) -> String {
    let parts = match breakdown.direction {
        Direction::DeveloperFit => developer_fit_reasons(breakdown),
        Direction::CompanyFit => company_fit_reasons(breakdown),
    };

    if parts.is_empty() {
        return match breakdown.direction {
            Direction::DeveloperFit => DEVELOPER_FALLBACK,
            Direction::CompanyFit => COMPANY_FALLBACK,
        }
        .to_string();
    }
    parts.join(", ")
}

fn developer_fit_reasons(breakdown: &ScoreBreakdown) -> Vec<String> {
    let signals = &breakdown.signals;
    let mut parts = Vec::new();

    match breakdown.match_percentage {
        100 => parts.push("Perfect skill match".to_string()),
        80.. => parts.push("Excellent skill match".to_string()),
        60.. => parts.push("Good skill match".to_string()),
        _ => {}
    }

    if signals.required_matches > 0 {
        parts.push(format!(
            "Matches {} critical {}",
            signals.required_matches,
            plural(signals.required_matches, "skill", "skills")
        ));
    }

    if signals.availability == Some(Availability::Available) {
        parts.push("Available now".to_string());
    }

    if signals.expert_matches > 0 {
        parts.push(format!(
            "{} expert-level {}",
            signals.expert_matches,
            plural(signals.expert_matches, "skill", "skills")
        ));
    }

    if signals.rate_at_max {
        parts.push("Rate within budget".to_string());
    }

    parts
}

fn company_fit_reasons(breakdown: &ScoreBreakdown) -> Vec<String> {
    let signals = &breakdown.signals;
    let mut parts = Vec::new();

    if signals.required_matches > 0 {
        parts.push(format!("Requires {} of your skills", signals.required_matches));
    }

    if signals.preferred_matches > 0 {
        parts.push(format!("Prefers {} of your skills", signals.preferred_matches));
    }

    if signals.flexible_work {
        parts.push("Offers flexible work".to_string());
    }

    if let Some(industry) = &signals.industry {
        parts.push(format!("{industry} industry"));
    }

    parts
}

fn plural(count: u32, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
