//! Industry taxonomy placement for company profiles.
//!
//! Rules are evaluated in list order and the first rule that matches by exact
//! keyword, fuzzy keyword, or fuzzy taxonomy label decides the result. There is
//! no scoring across rules.

mod matching;
pub(crate) mod normalizer;

pub use matching::{CompanyField, RuleMatch, FUZZY_THRESHOLD};

use super::domain::{CompanyRecord, IndustryResult};
use super::rules::IndustryRuleSet;
use normalizer::normalize;
use serde::Serialize;
use std::sync::Arc;

/// Classifier bound to one industry rule set.
#[derive(Debug, Clone)]
pub struct IndustryClassifier {
    rules: Arc<IndustryRuleSet>,
}

impl IndustryClassifier {
    pub fn new(rules: Arc<IndustryRuleSet>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, company: &CompanyRecord) -> IndustryResult {
        self.explain(company).result
    }

    /// Classifies and reports which rule matched and how.
    pub fn explain(&self, company: &CompanyRecord) -> IndustryExplanation {
        let name = normalize(&company.name);
        let description = normalize(&company.description);

        for (index, entry) in self.rules.entries().iter().enumerate() {
            if let Some(matched) = matching::match_rule(&name, &description, entry) {
                return IndustryExplanation {
                    result: IndustryResult::from_rule(&entry.rule),
                    rule_index: Some(index),
                    matched: Some(matched),
                };
            }
        }

        IndustryExplanation {
            result: IndustryResult::unknown(),
            rule_index: None,
            matched: None,
        }
    }
}

/// Result of [`IndustryClassifier::explain`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryExplanation {
    pub result: IndustryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<RuleMatch>,
}
