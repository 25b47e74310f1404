use crate::classification::rules::PreparedIndustryRule;
use serde::Serialize;
use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity accepted as a fuzzy match.
pub const FUZZY_THRESHOLD: f64 = 0.85;

/// Company text a rule matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyField {
    Name,
    Description,
}

/// How a rule was satisfied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleMatch {
    ExactKeyword {
        keyword: String,
        field: CompanyField,
    },
    FuzzyKeyword {
        keyword: String,
        field: CompanyField,
        score: f64,
    },
    FuzzyLabel {
        label: String,
        field: CompanyField,
        score: f64,
    },
}

/// Checks one rule against the already-normalized company name and description.
pub(crate) fn match_rule(
    name: &str,
    description: &str,
    rule: &PreparedIndustryRule,
) -> Option<RuleMatch> {
    let fields: Vec<(CompanyField, &str)> = [
        (CompanyField::Name, name),
        (CompanyField::Description, description),
    ]
    .into_iter()
    .filter(|(_, text)| !text.is_empty())
    .collect();

    if fields.is_empty() {
        return None;
    }

    for keyword in &rule.keywords {
        for (field, text) in &fields {
            if text.contains(keyword.as_str()) {
                return Some(RuleMatch::ExactKeyword {
                    keyword: keyword.clone(),
                    field: *field,
                });
            }
        }
    }

    for keyword in &rule.keywords {
        for (field, text) in &fields {
            let score = jaro_winkler(text, keyword);
            if score >= FUZZY_THRESHOLD {
                return Some(RuleMatch::FuzzyKeyword {
                    keyword: keyword.clone(),
                    field: *field,
                    score,
                });
            }
        }
    }

    for label in &rule.labels {
        for (field, text) in &fields {
            let score = jaro_winkler(text, label);
            if score >= FUZZY_THRESHOLD {
                return Some(RuleMatch::FuzzyLabel {
                    label: label.clone(),
                    field: *field,
                    score,
                });
            }
        }
    }

    None
}
