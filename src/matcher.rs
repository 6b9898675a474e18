use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::ReportError;
use crate::page::CellValue;

type TextPredicate = dyn Fn(&str) -> bool + Send + Sync;

#[derive(Clone)]
pub enum CellMatcher {
    Prefix(String),
    Exact(String),
    Regex(Regex),
    Predicate(Arc<TextPredicate>),
}

impl CellMatcher {
    #[must_use]
    pub fn prefix(prefix: &str) -> Self {
        Self::Prefix(prefix.trim().to_lowercase())
    }

    #[must_use]
    pub fn exact(text: &str) -> Self {
        Self::Exact(text.trim().to_lowercase())
    }

    pub fn regex(pattern: &str) -> Result<Self, ReportError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|error| ReportError::InvalidArgument(format!("bad cell pattern: {error}")))
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Self::Prefix(prefix) => text.trim().to_lowercase().starts_with(prefix.as_str()),
            Self::Exact(expected) => text.trim().to_lowercase() == *expected,
            Self::Regex(regex) => regex.is_match(text),
            Self::Predicate(predicate) => predicate(text),
        }
    }

    #[must_use]
    pub fn matches(&self, cell: &CellValue) -> bool {
        match cell {
            CellValue::Text(text) if !text.trim().is_empty() => self.matches_text(text),
            _ => false,
        }
    }

    pub(crate) fn is_blank_literal(&self) -> bool {
        match self {
            Self::Prefix(text) | Self::Exact(text) => text.is_empty(),
            Self::Regex(_) | Self::Predicate(_) => false,
        }
    }
}

impl fmt::Debug for CellMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(prefix) => write!(f, "prefix '{prefix}'"),
            Self::Exact(text) => write!(f, "exact '{text}'"),
            Self::Regex(regex) => write!(f, "pattern /{}/", regex.as_str()),
            Self::Predicate(_) => f.write_str("custom predicate"),
        }
    }
}

impl fmt::Display for CellMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<&str> for CellMatcher {
    fn from(prefix: &str) -> Self {
        Self::prefix(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::CellMatcher;
    use crate::page::CellValue;

    fn assert_matches(matcher: &CellMatcher, values: &[&str]) {
        for value in values {
            assert!(
                matcher.matches(&CellValue::Text((*value).to_string())),
                "{matcher} should match {value:?}"
            );
        }
    }

    fn assert_not_matches(matcher: &CellMatcher, values: &[&str]) {
        for value in values {
            assert!(
                !matcher.matches(&CellValue::Text((*value).to_string())),
                "{matcher} should not match {value:?}"
            );
        }
    }

    #[test]
    fn prefix_is_trimmed_and_case_insensitive() {
        let matcher = CellMatcher::prefix("table1");
        assert_matches(&matcher, &["table1", "TABLE1", " table1 ", "table12"]);
        assert_not_matches(&matcher, &["table2", "table", ""]);
        assert!(!matcher.matches(&CellValue::Empty));
        assert!(!matcher.matches(&CellValue::Number(1.0)));
        assert!(!matcher.matches(&CellValue::Bool(true)));
    }

    #[test]
    fn prefix_literal_is_normalized() {
        let matcher = CellMatcher::prefix("  Total1 ");
        assert_matches(&matcher, &["total1", "TOTAL1", " total1 ", "total12"]);
        assert_not_matches(&matcher, &["total2", "total"]);
    }

    #[test]
    fn exact_ignores_case_only() {
        let matcher = CellMatcher::exact("Итого");
        assert_matches(&matcher, &["итого", " ИТОГО "]);
        assert_not_matches(&matcher, &["Итого по счету"]);
    }

    #[test]
    fn regex_and_predicate_matchers() {
        let regex = CellMatcher::regex(r"^\d{4}-\d{2}-\d{2}$").expect("pattern should compile");
        assert_matches(&regex, &["2024-03-01"]);
        assert_not_matches(&regex, &["01.03.2024"]);

        let predicate = CellMatcher::predicate(|text| text == "table1");
        assert_matches(&predicate, &["table1"]);
        assert_not_matches(&predicate, &["TABLE1"]);
    }

    #[test]
    fn rejects_bad_pattern() {
        assert!(CellMatcher::regex("(").is_err());
    }
}
