use regex::Regex;
use std::collections::HashMap;

/// Lexical judgment over category names, supplied by the caller.
///
/// The surrounding extraction system owns the real implementation
/// (morphological analysis, stemming, abbreviation detection); the merge
/// pipeline only ever asks these two questions. Lookups return values,
/// never errors: an unclassifiable category is a data outcome.
pub trait CategoryClassifier {
    /// Is this category name structurally usable at all?
    fn is_well_formed(&self, name: &str) -> bool;

    /// The ontology class this category name most likely denotes, if any.
    fn projected_class(&self, name: &str) -> Option<String>;
}

/// Rule-driven classifier: regex patterns for ill-formed names plus a
/// literal projection table. This is the implementation the CLI wires in;
/// library callers usually bring their own.
pub struct RuleClassifier {
    ill_formed: Vec<Regex>,
    projections: HashMap<String, String>,
}

/// Administrative category patterns that never denote real-world classes.
const DEFAULT_ILL_FORMED: &[&str] = &[
    r"(?i)^wikiproject\b",
    r"(?i)^wikipedia\b",
    r"(?i)^articles\b",
    r"(?i)^pages\b",
    r"(?i)^redirects\b",
    r"(?i)\bstubs?$",
    r"(?i)\bmaintenance\b",
    r"(?i)\bdisambiguation\b",
];

impl RuleClassifier {
    /// Classifier with the default ill-formed patterns and no projections.
    pub fn new() -> Self {
        Self::from_rules(DEFAULT_ILL_FORMED.iter().copied(), HashMap::new())
            .expect("default patterns compile")
    }

    /// Classifier from explicit patterns and a projection table.
    pub fn from_rules<I, S>(
        patterns: I,
        projections: HashMap<String, String>,
    ) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ill_formed = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            ill_formed,
            projections,
        })
    }

    pub fn add_projection(&mut self, category: impl Into<String>, class: impl Into<String>) {
        self.projections.insert(category.into(), class.into());
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier for RuleClassifier {
    fn is_well_formed(&self, name: &str) -> bool {
        !name.trim().is_empty() && !self.ill_formed.iter().any(|re| re.is_match(name))
    }

    fn projected_class(&self, name: &str) -> Option<String> {
        self.projections.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_reject_admin_categories() {
        let classifier = RuleClassifier::new();
        assert!(!classifier.is_well_formed("WikiProject Biology"));
        assert!(!classifier.is_well_formed("Articles needing cleanup"));
        assert!(!classifier.is_well_formed("Germany geography stubs"));
        assert!(!classifier.is_well_formed("  "));
        assert!(classifier.is_well_formed("German companies"));
    }

    #[test]
    fn projections_come_from_the_table() {
        let mut classifier = RuleClassifier::new();
        classifier.add_projection("German companies", "wordnet_company");
        assert_eq!(
            classifier.projected_class("German companies").as_deref(),
            Some("wordnet_company")
        );
        assert_eq!(classifier.projected_class("Biology"), None);
    }

    #[test]
    fn bad_patterns_are_reported() {
        let result = RuleClassifier::from_rules(["("], HashMap::new());
        assert!(result.is_err());
    }
}
