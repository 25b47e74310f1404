use regex::{Regex, RegexBuilder};

/// Case-insensitive whole-word matcher compiled from a set of literal keywords.
///
/// All keywords are folded into one alternation so a lookup is a single regex
/// scan. Word boundaries are only anchored on sides where the keyword starts or
/// ends with an ASCII alphanumeric character; CJK keywords are matched as plain
/// substrings because `\b` never fires between two ideographs.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
    keywords: usize,
}

impl KeywordMatcher {
    pub fn compile<I, S>(keywords: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut alternatives: Vec<String> = keywords
            .into_iter()
            .filter_map(|keyword| keyword_pattern(keyword.as_ref()))
            .collect();
        alternatives.sort();
        alternatives.dedup();

        if alternatives.is_empty() {
            return Ok(Self::empty());
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern: Some(pattern),
            keywords: alternatives.len(),
        })
    }

    /// Matcher that never matches; used for keyword sets left empty in a rule file.
    pub fn empty() -> Self {
        Self {
            pattern: None,
            keywords: 0,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|pattern| pattern.is_match(text))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords == 0
    }
}

fn keyword_pattern(keyword: &str) -> Option<String> {
    let trimmed = keyword.trim();
    let first = trimmed.chars().next()?;
    let last = trimmed.chars().last()?;

    let mut pattern = String::with_capacity(trimmed.len() + 8);
    if first.is_ascii_alphanumeric() {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(trimmed));
    if last.is_ascii_alphanumeric() {
        pattern.push_str(r"\b");
    }
    Some(pattern)
}
