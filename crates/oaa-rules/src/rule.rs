//! Rule Definition
//!
//! A rule is immutable metadata plus a validation procedure that reads the
//! classification cache and emits element results.

use std::fmt;

use oaa_cache::ClassificationCache;

use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ElementResult, ResultCollector};

/// Validation procedure of a rule
pub type ValidateFn =
    fn(&ClassificationCache<'_>, &mut ResultCollector<'_, '_>) -> Result<(), RuleError>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub scope: RuleScope,
    pub category: RuleCategory,
    pub group: RuleGroup,
    /// WCAG 2.0 success criterion, e.g. `1.4.3`
    pub wcag_primary_id: &'static str,
    pub wcag_related_ids: &'static [&'static str],
    /// Element selectors the rule looks at
    pub target_resources: &'static [&'static str],
    pub summary: &'static str,
    pub validate: ValidateFn,
}

impl Rule {
    /// Run the procedure against a cache
    pub fn evaluate(&self, cache: &ClassificationCache<'_>) -> Result<Vec<ElementResult>, RuleError> {
        let mut out = ResultCollector::new(cache);
        (self.validate)(cache, &mut out)?;
        Ok(out.into_results())
    }

    /// WCAG guideline the primary criterion belongs to (`1.4` for `1.4.3`)
    pub fn guideline_id(&self) -> &'static str {
        match self.wcag_primary_id.rfind('.') {
            Some(i) if self.wcag_primary_id[..i].contains('.') => &self.wcag_primary_id[..i],
            _ => self.wcag_primary_id,
        }
    }

    /// WCAG principle (`1` for `1.4.3`)
    pub fn principle_id(&self) -> &'static str {
        self.wcag_primary_id
            .split_once('.')
            .map(|(p, _)| p)
            .unwrap_or(self.wcag_primary_id)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("category", &self.category)
            .field("group", &self.group)
            .field("wcag_primary_id", &self.wcag_primary_id)
            .finish_non_exhaustive()
    }
}
