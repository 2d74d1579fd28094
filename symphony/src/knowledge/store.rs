use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::templates::BASE_TEMPLATES;

/// A trigger keyword and the response body it expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub keyword: String,
    pub body: String,
}

impl Template {
    pub fn new(keyword: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            body: body.into(),
        }
    }
}

/// Ordered keyword to template mapping.
///
/// Keywords are unique. Widening only adds keywords that are not present yet;
/// existing entries are removed only by [`KnowledgeStore::reset`].
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    base: Vec<Template>,
    templates: Vec<Template>,
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::new(
            BASE_TEMPLATES
                .iter()
                .map(|(keyword, body)| Template::new(*keyword, *body)),
        )
    }
}

impl KnowledgeStore {
    pub fn new(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut store = Self {
            base: Vec::new(),
            templates: Vec::new(),
        };
        store.widen(templates);
        store.base = store.templates.clone();
        store
    }

    pub fn lookup(&self, keyword: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.keyword == keyword)
    }

    /// First template, in registration order, whose keyword appears in the
    /// lowercased query.
    pub fn find_match(&self, query: &str) -> Option<&Template> {
        let query = query.to_lowercase();
        self.templates
            .iter()
            .find(|t| query.contains(&t.keyword.to_lowercase()))
    }

    /// Union new keyword/template pairs into the store. Returns how many were added.
    pub fn widen(&mut self, templates: impl IntoIterator<Item = Template>) -> usize {
        let mut known: HashSet<String> = self.templates.iter().map(|t| t.keyword.clone()).collect();
        let before = self.templates.len();

        for template in templates {
            if template.keyword.is_empty() {
                tracing::warn!("Skipping template with empty keyword");
                continue;
            }
            if known.insert(template.keyword.clone()) {
                self.templates.push(template);
            }
        }

        self.templates.len() - before
    }

    /// Drop every widened entry and restore the construction-time set.
    pub fn reset(&mut self) {
        self.templates = self.base.clone();
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.keyword.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::templates::TRAINED_TEMPLATES;

    fn store(pairs: &[(&str, &str)]) -> KnowledgeStore {
        KnowledgeStore::new(pairs.iter().map(|(k, b)| Template::new(*k, *b)))
    }

    #[test]
    fn test_lookup_exact_keyword() {
        let store = store(&[("health", "H"), ("latency", "L")]);
        assert_eq!(store.lookup("latency").map(|t| t.body.as_str()), Some("L"));
        assert!(store.lookup("lat").is_none());
    }

    #[test]
    fn test_find_match_is_case_insensitive_substring() {
        let store = store(&[("health", "H")]);
        assert!(store.find_match("Show me HEALTHCHECK results").is_some());
        assert!(store.find_match("nothing relevant").is_none());
    }

    #[test]
    fn test_first_registered_keyword_wins() {
        let store = store(&[("memory", "M"), ("cpu", "C")]);
        let hit = store.find_match("cpu and memory please").unwrap();
        assert_eq!(hit.keyword, "memory");
    }

    #[test]
    fn test_widen_keeps_existing_entries() {
        let mut store = store(&[("health", "original")]);
        let added = store.widen([Template::new("health", "replacement"), Template::new("trend", "T")]);

        assert_eq!(added, 1);
        assert_eq!(store.lookup("health").unwrap().body, "original");
        assert_eq!(store.keywords().collect::<Vec<_>>(), vec!["health", "trend"]);
    }

    #[test]
    fn test_reset_restores_base_set() {
        let mut store = KnowledgeStore::default();
        let base_len = store.len();

        store.widen(TRAINED_TEMPLATES.iter().map(|(k, b)| Template::new(*k, *b)));
        assert_eq!(store.len(), base_len + TRAINED_TEMPLATES.len());

        store.reset();
        assert_eq!(store.len(), base_len);
        assert!(store.lookup("trend").is_none());
    }

    #[test]
    fn test_duplicate_keywords_in_constructor_are_collapsed() {
        let store = store(&[("cpu", "first"), ("cpu", "second")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("cpu").unwrap().body, "first");
    }
}
