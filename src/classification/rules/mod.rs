//! Rule snapshots consulted by the classifiers and the store that swaps them.
//!
//! A [`RuleSnapshot`] bundles the employment keyword sets (with their compiled
//! matchers) and the ordered industry taxonomy. Snapshots are immutable; the
//! [`RuleStore`] replaces the whole snapshot on every successful reload.

mod defaults;
mod store;

pub use store::{ReloadSchedule, RuleSource, RuleStore};

use super::domain::{EmploymentCategory, IndustryRule};
use super::industry::normalizer::normalize;
use super::patterns::KeywordMatcher;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

/// Employment rule file as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmploymentKeywords {
    #[serde(default)]
    pub intern_keywords: Vec<String>,
    #[serde(default)]
    pub campus_keywords: Vec<String>,
    #[serde(default)]
    pub parttime_keywords: Vec<String>,
    #[serde(default)]
    pub no_experience_keywords: Vec<String>,
    #[serde(default)]
    pub manager_keywords: Vec<String>,
    /// Reserved for context-sensitive refinement; carried but not scored.
    #[serde(default)]
    pub context_keywords: Vec<String>,
    /// Reserved for exclusion lists; carried but not scored.
    #[serde(default)]
    pub exclusion_keywords: Vec<String>,
    /// Source-provided type label to category. Falls back to the built-in map when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_type_map: Option<BTreeMap<String, EmploymentCategory>>,
}

/// Compiled employment rules. Matchers share the lifetime of the snapshot.
#[derive(Debug, Clone)]
pub struct EmploymentRuleSet {
    keywords: EmploymentKeywords,
    pub(crate) intern: KeywordMatcher,
    pub(crate) campus: KeywordMatcher,
    pub(crate) part_time: KeywordMatcher,
    pub(crate) no_experience: KeywordMatcher,
    pub(crate) manager: KeywordMatcher,
    raw_types: HashMap<String, EmploymentCategory>,
}

static DEFAULT_EMPLOYMENT_RULES: Lazy<Arc<EmploymentRuleSet>> = Lazy::new(|| {
    Arc::new(
        EmploymentRuleSet::from_keywords(defaults::employment_keywords())
            .expect("built-in employment keywords compile"),
    )
});

impl EmploymentRuleSet {
    pub fn from_keywords(keywords: EmploymentKeywords) -> Result<Self, RuleLoadError> {
        let intern = compile("intern_keywords", &keywords.intern_keywords)?;
        let campus = compile("campus_keywords", &keywords.campus_keywords)?;
        let part_time = compile("parttime_keywords", &keywords.parttime_keywords)?;
        let no_experience = compile("no_experience_keywords", &keywords.no_experience_keywords)?;
        let manager = compile("manager_keywords", &keywords.manager_keywords)?;

        let raw_types = match &keywords.raw_type_map {
            Some(map) => normalize_raw_types(map),
            None => normalize_raw_types(&defaults::raw_type_map()),
        };

        Ok(Self {
            keywords,
            intern,
            campus,
            part_time,
            no_experience,
            manager,
            raw_types,
        })
    }

    /// Built-in rules used until a rule file loads successfully.
    pub fn defaults() -> Arc<Self> {
        DEFAULT_EMPLOYMENT_RULES.clone()
    }

    pub fn keywords(&self) -> &EmploymentKeywords {
        &self.keywords
    }

    /// Looks up a source-provided type label, lowercased and trimmed.
    pub fn raw_type(&self, raw: &str) -> Option<EmploymentCategory> {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.raw_types.get(&key).copied()
    }

    pub fn raw_type_count(&self) -> usize {
        self.raw_types.len()
    }
}

fn compile(set: &'static str, keywords: &[String]) -> Result<KeywordMatcher, RuleLoadError> {
    KeywordMatcher::compile(keywords).map_err(|source| RuleLoadError::Pattern { set, source })
}

fn normalize_raw_types(
    map: &BTreeMap<String, EmploymentCategory>,
) -> HashMap<String, EmploymentCategory> {
    map.iter()
        .map(|(raw, category)| (raw.trim().to_lowercase(), *category))
        .filter(|(raw, _)| !raw.is_empty())
        .collect()
}

/// Industry rule with its keywords and labels pre-normalized for matching.
#[derive(Debug, Clone)]
pub(crate) struct PreparedIndustryRule {
    pub(crate) rule: IndustryRule,
    pub(crate) keywords: Vec<String>,
    pub(crate) labels: Vec<String>,
}

impl PreparedIndustryRule {
    fn new(rule: IndustryRule) -> Self {
        let keywords = rule
            .keywords
            .iter()
            .map(|keyword| normalize(keyword))
            .filter(|keyword| !keyword.is_empty())
            .collect();
        let labels = rule
            .labels()
            .map(normalize)
            .filter(|label| !label.is_empty())
            .collect();

        Self {
            rule,
            keywords,
            labels,
        }
    }
}

/// Ordered industry taxonomy. Order is significant: the first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct IndustryRuleSet {
    entries: Vec<PreparedIndustryRule>,
}

static DEFAULT_INDUSTRY_RULES: Lazy<Arc<IndustryRuleSet>> =
    Lazy::new(|| Arc::new(IndustryRuleSet::new(defaults::industry_rules())));

impl IndustryRuleSet {
    pub fn new(rules: Vec<IndustryRule>) -> Self {
        Self {
            entries: rules.into_iter().map(PreparedIndustryRule::new).collect(),
        }
    }

    pub fn defaults() -> Arc<Self> {
        DEFAULT_INDUSTRY_RULES.clone()
    }

    pub fn rules(&self) -> impl Iterator<Item = &IndustryRule> {
        self.entries.iter().map(|entry| &entry.rule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[PreparedIndustryRule] {
        &self.entries
    }
}

impl From<Vec<IndustryRule>> for IndustryRuleSet {
    fn from(rules: Vec<IndustryRule>) -> Self {
        Self::new(rules)
    }
}

/// Where the data of a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOrigin {
    Defaults,
    File,
}

/// Immutable bundle of rules published by the [`RuleStore`].
#[derive(Debug, Clone)]
pub struct RuleSnapshot {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub origin: SnapshotOrigin,
    pub employment: Arc<EmploymentRuleSet>,
    pub industry: Arc<IndustryRuleSet>,
}

impl RuleSnapshot {
    pub(crate) fn defaults(version: u64) -> Self {
        Self {
            version,
            loaded_at: Utc::now(),
            origin: SnapshotOrigin::Defaults,
            employment: EmploymentRuleSet::defaults(),
            industry: IndustryRuleSet::defaults(),
        }
    }

    pub fn summary(&self) -> RuleSnapshotSummary {
        let employment = &self.employment;
        RuleSnapshotSummary {
            version: self.version,
            origin: self.origin,
            loaded_at: self.loaded_at,
            intern_keywords: employment.intern.len(),
            campus_keywords: employment.campus.len(),
            parttime_keywords: employment.part_time.len(),
            no_experience_keywords: employment.no_experience.len(),
            manager_keywords: employment.manager.len(),
            raw_types: employment.raw_type_count(),
            industry_rules: self.industry.len(),
        }
    }
}

/// Serializable overview of a snapshot for logs and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSnapshotSummary {
    pub version: u64,
    pub origin: SnapshotOrigin,
    pub loaded_at: DateTime<Utc>,
    pub intern_keywords: usize,
    pub campus_keywords: usize,
    pub parttime_keywords: usize,
    pub no_experience_keywords: usize,
    pub manager_keywords: usize,
    pub raw_types: usize,
    pub industry_rules: usize,
}

/// Failure to build a snapshot from rule files. The store keeps serving the previous snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RuleLoadError {
    #[error("rule file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("keyword set `{set}` could not be compiled: {source}")]
    Pattern {
        set: &'static str,
        #[source]
        source: regex::Error,
    },
}
