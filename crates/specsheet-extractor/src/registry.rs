//! Extractors keyed by attribute name

use crate::config::ExtractorConfig;
use crate::error::PipelineError;
use crate::extractor::AttributeExtractor;
use crate::spec::Roster;
use specsheet_domain::traits::CompletionProvider;
use std::fmt::Display;
use std::sync::Arc;

/// One extractor per roster entry, sharing a single provider
///
/// Extractors are kept in roster order.
pub struct AttributeRegistry<L> {
    extractors: Vec<Arc<AttributeExtractor<L>>>,
}

impl<L> AttributeRegistry<L>
where
    L: CompletionProvider,
    L::Error: Display,
{
    /// Build the registry for a roster
    pub fn new(roster: &Roster, provider: Arc<L>, config: &ExtractorConfig) -> Self {
        let extractors = roster
            .entries()
            .iter()
            .cloned()
            .map(|entry| {
                Arc::new(AttributeExtractor::from_entry(
                    entry,
                    Arc::clone(&provider),
                    config,
                ))
            })
            .collect();
        Self { extractors }
    }

    /// Look up an extractor by attribute name
    pub fn get(&self, name: &str) -> Option<&Arc<AttributeExtractor<L>>> {
        self.extractors.iter().find(|e| e.name() == name)
    }

    /// Attribute names in roster order
    pub fn names(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Every extractor, in roster order
    pub fn all(&self) -> Vec<Arc<AttributeExtractor<L>>> {
        self.extractors.clone()
    }

    /// Extractors for `names`, in the order given
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` for the first name not in the roster.
    pub fn select<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<Arc<AttributeExtractor<L>>>, PipelineError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .cloned()
                    .ok_or_else(|| PipelineError::UnknownAttribute(name.to_string()))
            })
            .collect()
    }

    /// Number of extractors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::AttributeSpec;
    use specsheet_llm::MockProvider;

    fn registry() -> AttributeRegistry<MockProvider> {
        let roster = Roster::new([
            AttributeSpec::new("colour", "Find the colour", "m"),
            AttributeSpec::new("gender", "Find the gender", "m"),
            AttributeSpec::new("rows", "", "m"),
        ]);
        AttributeRegistry::new(
            &roster,
            Arc::new(MockProvider::default()),
            &ExtractorConfig::default(),
        )
    }

    #[test]
    fn test_registry_follows_roster() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["colour", "gender", "rows"]);
        assert!(registry.get("colour").unwrap().is_ready());
        assert!(!registry.get("rows").unwrap().is_ready());
        assert!(registry.get("width").is_none());
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let registry = registry();
        let selected = registry.select(&["gender", "colour"]).unwrap();
        let names: Vec<_> = selected.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["gender", "colour"]);
    }

    #[test]
    fn test_select_unknown_attribute() {
        let registry = registry();
        let result = registry.select(&["colour", "width"]);
        assert!(matches!(
            result,
            Err(PipelineError::UnknownAttribute(name)) if name == "width"
        ));
    }
}
