use once_cell::sync::Lazy;
use regex::Regex;

static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d+\s*(week|month|year)s?").expect("duration regex"));

// The leading non-digit guard keeps calendar years such as "2025年" from reading as 25 years.
static EXPERIENCE_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\d])(\d{1,2})\s*\+?\s*(?:years?\b|yrs?\b|年)").expect("years regex")
});

/// Whether the text mentions a duration such as "3 months" or "6 weeks".
pub(crate) fn mentions_duration(text: &str) -> bool {
    DURATION.is_match(text)
}

/// Largest years-of-experience figure in phrases like "3-5 years", "at least 4 years", "5+ years".
pub(crate) fn max_experience_years(text: &str) -> Option<u32> {
    EXPERIENCE_YEARS
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|years| years.as_str().parse::<u32>().ok())
        .max()
}
