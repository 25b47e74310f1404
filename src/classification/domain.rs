use serde::{Deserialize, Serialize};
use std::fmt;

/// Crawled job posting as handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub description: String,
    /// Employment type as published by the source site, when it offers one.
    #[serde(default)]
    pub raw_type: Option<String>,
}

impl JobRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            raw_type: None,
        }
    }

    pub fn with_raw_type(mut self, raw_type: impl Into<String>) -> Self {
        self.raw_type = Some(raw_type.into());
        self
    }

    /// Lowercased `title + " " + description`, the text keyword signals scan.
    pub(crate) fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Normalized employment type assigned to a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentCategory {
    Intern,
    FullTimeCampus,
    FullTimeSocial,
    PartTime,
}

impl EmploymentCategory {
    pub const ALL: [EmploymentCategory; 4] = [
        EmploymentCategory::Intern,
        EmploymentCategory::FullTimeCampus,
        EmploymentCategory::FullTimeSocial,
        EmploymentCategory::PartTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentCategory::Intern => "intern",
            EmploymentCategory::FullTimeCampus => "full-time-campus",
            EmploymentCategory::FullTimeSocial => "full-time-social",
            EmploymentCategory::PartTime => "part-time",
        }
    }
}

impl fmt::Display for EmploymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Company profile to place in the industry taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One entry of the ordered industry taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndustryRule {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default, rename = "subIndustry")]
    pub sub_industry: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl IndustryRule {
    pub fn new(
        sector: Option<&str>,
        industry: Option<&str>,
        sub_industry: Option<&str>,
        keywords: &[&str],
    ) -> Self {
        Self {
            sector: sector.map(str::to_string),
            industry: industry.map(str::to_string),
            sub_industry: sub_industry.map(str::to_string),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }

    /// The rule's own taxonomy labels, which also take part in fuzzy matching.
    pub(crate) fn labels(&self) -> impl Iterator<Item = &str> {
        [&self.sector, &self.industry, &self.sub_industry]
            .into_iter()
            .filter_map(|label| label.as_deref())
    }
}

/// Taxonomy placement returned for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryResult {
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "subIndustry")]
    pub sub_industry: Option<String>,
}

impl IndustryResult {
    pub const UNKNOWN_SECTOR: &'static str = "Unknown";

    pub fn unknown() -> Self {
        Self {
            sector: Some(Self::UNKNOWN_SECTOR.to_string()),
            industry: None,
            sub_industry: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.sector.as_deref() == Some(Self::UNKNOWN_SECTOR)
            && self.industry.is_none()
            && self.sub_industry.is_none()
    }

    pub(crate) fn from_rule(rule: &IndustryRule) -> Self {
        Self {
            sector: non_blank(&rule.sector),
            industry: non_blank(&rule.industry),
            sub_industry: non_blank(&rule.sub_industry),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
