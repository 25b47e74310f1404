//! Employment-type classification for job postings.
//!
//! Signals are evaluated in a fixed order and each carries a weight. A signal
//! only replaces the running decision when its weight is strictly greater,
//! except that part-time keywords may displace an intern or campus keyword hit.
//! A recognized source-provided type (weight 4) always has the final say.

mod experience;
mod signals;

pub use signals::{SignalKind, SignalOutcome};

use super::domain::{EmploymentCategory, JobRecord};
use super::rules::EmploymentRuleSet;
use serde::Serialize;
use signals::WeightedDecision;
use std::sync::Arc;

/// Classifier bound to one employment rule set.
#[derive(Debug, Clone)]
pub struct EmploymentClassifier {
    rules: Arc<EmploymentRuleSet>,
}

impl EmploymentClassifier {
    pub fn new(rules: Arc<EmploymentRuleSet>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, job: &JobRecord) -> EmploymentCategory {
        self.explain(job).category
    }

    /// Classifies and returns every signal that fired along the way.
    pub fn explain(&self, job: &JobRecord) -> EmploymentExplanation {
        let rules = &self.rules;
        let text = job.combined_text();
        let mut decision = WeightedDecision::default();

        let has_intern = rules.intern.is_match(&text);
        let has_campus = rules.campus.is_match(&text) || rules.no_experience.is_match(&text);
        let has_part_time = rules.part_time.is_match(&text);

        if has_intern {
            decision.offer(SignalKind::InternKeyword, EmploymentCategory::Intern);
        }
        if has_campus {
            decision.offer(SignalKind::CampusKeyword, EmploymentCategory::FullTimeCampus);
        }
        if has_part_time {
            decision.offer_part_time();
        }

        if experience::mentions_duration(&job.description) {
            if has_intern {
                decision.offer(SignalKind::Duration, EmploymentCategory::Intern);
            } else if has_part_time {
                decision.offer(SignalKind::Duration, EmploymentCategory::PartTime);
            }
        }

        let experience_years = experience::max_experience_years(&text);
        if let Some(years) = experience_years {
            let category = if years >= 3 {
                EmploymentCategory::FullTimeSocial
            } else {
                EmploymentCategory::FullTimeCampus
            };
            decision.offer(SignalKind::ExperienceYears, category);
        }

        if rules.manager.is_match(&text) {
            decision.offer(SignalKind::ManagerTitle, EmploymentCategory::FullTimeSocial);
        }

        if let Some(category) = job.raw_type.as_deref().and_then(|raw| rules.raw_type(raw)) {
            decision.offer(SignalKind::RawType, category);
        }

        let (category, weight, signals) = decision.finish();
        EmploymentExplanation {
            category,
            weight,
            experience_years,
            signals,
        }
    }
}

/// Result of [`EmploymentClassifier::explain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmploymentExplanation {
    pub category: EmploymentCategory,
    /// Weight of the deciding signal; 0 when the default was used.
    pub weight: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    pub signals: Vec<SignalOutcome>,
}
