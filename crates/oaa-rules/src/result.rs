//! Element Results
//!
//! What a rule procedure emits: one [`ElementResult`] per inspected item
//! (or per page / website pseudo-element), carrying a message key and its
//! positional parameters. Text is never rendered here.

use oaa_cache::{ClassificationCache, ElementIndex, Inspectable, PAGE_ORDINAL, WEBSITE_ORDINAL};
use oaa_dom::NodeId;
use serde::Serialize;

/// Outcome of one rule against one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestResult {
    Pass,
    /// Becomes a violation or a warning depending on the ruleset
    Fail,
    ManualCheck,
    Hidden,
    NotApplicable,
}

impl TestResult {
    /// Counts towards the rule verdict
    pub fn is_applicable(self) -> bool {
        !matches!(self, Self::Hidden | Self::NotApplicable)
    }
}

/// Stable identity of the item a result points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTarget {
    /// Document order index; 1 is the page, 0 the website
    pub ordinal_position: u32,
    pub node: Option<NodeId>,
    pub element: Option<ElementIndex>,
    pub tag_name: String,
    pub elem_name: String,
}

impl ResultTarget {
    pub fn page() -> Self {
        Self {
            ordinal_position: PAGE_ORDINAL,
            node: None,
            element: None,
            tag_name: "page".into(),
            elem_name: "page".into(),
        }
    }

    pub fn website() -> Self {
        Self {
            ordinal_position: WEBSITE_ORDINAL,
            node: None,
            element: None,
            tag_name: "website".into(),
            elem_name: "website".into(),
        }
    }

    pub fn is_page(&self) -> bool {
        self.element.is_none() && self.ordinal_position == PAGE_ORDINAL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementResult {
    pub test_result: TestResult,
    pub target: ResultTarget,
    pub message_key: String,
    pub params: Vec<String>,
}

/// Accumulates the element results of one rule invocation
#[derive(Debug)]
pub struct ResultCollector<'c, 'a> {
    cache: &'c ClassificationCache<'a>,
    results: Vec<ElementResult>,
}

impl<'c, 'a> ResultCollector<'c, 'a> {
    pub fn new(cache: &'c ClassificationCache<'a>) -> Self {
        Self {
            cache,
            results: Vec::new(),
        }
    }

    pub fn cache(&self) -> &'c ClassificationCache<'a> {
        self.cache
    }

    /// Record a result against a cached item
    pub fn add(
        &mut self,
        test_result: TestResult,
        item: &impl Inspectable,
        message_key: &str,
        params: Vec<String>,
    ) {
        let element_ref = item.element_ref();
        let (tag_name, elem_name) = self
            .cache
            .element(element_ref.index)
            .map(|e| (e.tag_name.clone(), e.elem_name.clone()))
            .unwrap_or_default();
        let target = ResultTarget {
            ordinal_position: element_ref.ordinal_position,
            node: Some(element_ref.node),
            element: Some(element_ref.index),
            tag_name,
            elem_name,
        };
        self.push(test_result, target, message_key, params);
    }

    /// Record the result for the page pseudo-element
    pub fn add_page(&mut self, test_result: TestResult, message_key: &str, params: Vec<String>) {
        self.push(test_result, ResultTarget::page(), message_key, params);
    }

    /// Record the result for the website pseudo-element
    pub fn add_website(&mut self, test_result: TestResult, message_key: &str, params: Vec<String>) {
        self.push(test_result, ResultTarget::website(), message_key, params);
    }

    fn push(&mut self, test_result: TestResult, target: ResultTarget, key: &str, params: Vec<String>) {
        self.results.push(ElementResult {
            test_result,
            target,
            message_key: key.to_string(),
            params,
        });
    }

    pub fn results(&self) -> &[ElementResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<ElementResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaa_cache::EventProcessing;

    #[test]
    fn test_add_records_element_identity() {
        let doc = oaa_html::parse(r#"<body><a id="x" href="/a">A</a></body>"#).unwrap();
        let cache = ClassificationCache::build(&doc, EventProcessing::None);
        let mut out = ResultCollector::new(&cache);
        let link = &cache.links()[0];
        out.add(TestResult::Pass, link, "ELEMENT_PASS_1", vec!["a".into()]);
        out.add_page(TestResult::ManualCheck, "PAGE_MC_1", Vec::new());

        let results = out.into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].target.elem_name, "a#x");
        assert_eq!(results[0].target.tag_name, "a");
        assert_eq!(results[0].target.ordinal_position, 3);
        assert!(results[1].target.is_page());
        assert_eq!(results[1].target.ordinal_position, PAGE_ORDINAL);
    }

    #[test]
    fn test_applicability() {
        assert!(TestResult::Fail.is_applicable());
        assert!(TestResult::ManualCheck.is_applicable());
        assert!(!TestResult::Hidden.is_applicable());
        assert!(!TestResult::NotApplicable.is_applicable());
    }
}
