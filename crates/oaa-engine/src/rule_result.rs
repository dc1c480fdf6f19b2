//! Rule Results
//!
//! One [`RuleResult`] per executed rule: the element results it produced,
//! their counts, the rule-level verdict and the implementation score.

use serde::{Serialize, Serializer};

use oaa_rules::{ElementResult, Rule, TestResult};

/// Per-element verdict once the required flag is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementResultValue {
    Undefined = 0,
    Pass = 1,
    Hidden = 2,
    ManualCheck = 3,
    Warning = 4,
    Violation = 5,
}

impl ElementResultValue {
    pub fn from_test_result(result: TestResult, required: bool) -> Self {
        match result {
            TestResult::Pass => Self::Pass,
            TestResult::Hidden => Self::Hidden,
            TestResult::ManualCheck => Self::ManualCheck,
            TestResult::Fail if required => Self::Violation,
            TestResult::Fail => Self::Warning,
            TestResult::NotApplicable => Self::Undefined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Pass => "pass",
            Self::Hidden => "hidden",
            Self::ManualCheck => "manual check",
            Self::Warning => "warning",
            Self::Violation => "violation",
        }
    }
}

/// Rule-level verdict; the derived order is the precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleResultValue {
    NotApplicable = 1,
    Pass = 2,
    ManualCheck = 3,
    Warning = 4,
    Violation = 5,
}

impl RuleResultValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "N/A",
            Self::Pass => "P",
            Self::ManualCheck => "MC",
            Self::Warning => "W",
            Self::Violation => "V",
        }
    }
}

/// Qualitative bucket for an implementation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImplementationValue {
    #[default]
    Undefined = 0,
    NotApplicable = 1,
    NotImplemented = 2,
    PartialImplementation = 3,
    AlmostComplete = 4,
    Complete = 5,
    CompleteWithManualChecks = 6,
    ManualChecksOnly = 7,
}

impl ImplementationValue {
    /// Bucket a score; a negative score means nothing was scorable
    pub fn from_score(score: i32, has_manual_checks: bool) -> Self {
        match score {
            100 if has_manual_checks => Self::CompleteWithManualChecks,
            100 => Self::Complete,
            96..=99 => Self::AlmostComplete,
            51..=95 => Self::PartialImplementation,
            0..=50 => Self::NotImplemented,
            _ if has_manual_checks => Self::ManualChecksOnly,
            _ => Self::NotApplicable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::NotApplicable => "Not Applicable",
            Self::NotImplemented => "Not Implemented",
            Self::PartialImplementation => "Partial Implementation",
            Self::AlmostComplete => "Almost Complete",
            Self::Complete => "Complete",
            Self::CompleteWithManualChecks => "Complete with Manual Checks",
            Self::ManualChecksOnly => "Manual Checks Only",
        }
    }
}

macro_rules! serialize_as_code {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(*self as u8)
            }
        }
    )*};
}

serialize_as_code!(ElementResultValue, RuleResultValue, ImplementationValue);

/// `round(100 * passed / scorable)`, held below 100 while failures remain
///
/// Returns -1 when nothing is scorable.
pub fn implementation_score(passed: usize, failures: usize) -> i32 {
    let total = passed + failures;
    if total == 0 {
        return -1;
    }
    let score = (100.0 * passed as f64 / total as f64).round() as i32;
    if score == 100 && failures > 0 { 99 } else { score }
}

/// Counts of element results by value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleResultSummary {
    pub violations: usize,
    pub warnings: usize,
    pub manual_checks: usize,
    pub passed: usize,
    pub hidden: usize,
}

impl RuleResultSummary {
    fn add(&mut self, value: ElementResultValue) {
        match value {
            ElementResultValue::Violation => self.violations += 1,
            ElementResultValue::Warning => self.warnings += 1,
            ElementResultValue::ManualCheck => self.manual_checks += 1,
            ElementResultValue::Pass => self.passed += 1,
            ElementResultValue::Hidden => self.hidden += 1,
            ElementResultValue::Undefined => {}
        }
    }

    pub fn failures(&self) -> usize {
        self.violations + self.warnings
    }

    pub fn result_value(&self) -> RuleResultValue {
        if self.violations > 0 {
            RuleResultValue::Violation
        } else if self.warnings > 0 {
            RuleResultValue::Warning
        } else if self.manual_checks > 0 {
            RuleResultValue::ManualCheck
        } else if self.passed > 0 {
            RuleResultValue::Pass
        } else {
            RuleResultValue::NotApplicable
        }
    }

    pub fn implementation_score(&self) -> i32 {
        implementation_score(self.passed, self.failures())
    }
}

/// How the rule procedure finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleExecution {
    Completed,
    /// The procedure returned an error or panicked
    Failed { message: String },
}

/// Rule-level message: a key plus count parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMessage {
    pub key: &'static str,
    pub params: Vec<String>,
}

impl RuleMessage {
    fn new(key: &'static str, count: Option<usize>) -> Self {
        Self {
            key,
            params: count.map(|c| vec![c.to_string()]).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleResult {
    rule: Rule,
    required: bool,
    execution: RuleExecution,
    element_results: Vec<ElementResult>,
    summary: RuleResultSummary,
}

impl RuleResult {
    pub fn new(rule: Rule, required: bool, element_results: Vec<ElementResult>) -> Self {
        let mut summary = RuleResultSummary::default();
        for result in &element_results {
            summary.add(ElementResultValue::from_test_result(result.test_result, required));
        }
        Self {
            rule,
            required,
            execution: RuleExecution::Completed,
            element_results,
            summary,
        }
    }

    /// A rule whose procedure did not complete; it carries no element results
    pub fn failed(rule: Rule, required: bool, message: impl Into<String>) -> Self {
        Self {
            rule,
            required,
            execution: RuleExecution::Failed {
                message: message.into(),
            },
            element_results: Vec::new(),
            summary: RuleResultSummary::default(),
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn rule_id(&self) -> &'static str {
        self.rule.id
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn execution(&self) -> &RuleExecution {
        &self.execution
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.execution, RuleExecution::Failed { .. })
    }

    pub fn element_results(&self) -> &[ElementResult] {
        &self.element_results
    }

    pub fn summary(&self) -> &RuleResultSummary {
        &self.summary
    }

    pub fn element_value(&self, result: &ElementResult) -> ElementResultValue {
        ElementResultValue::from_test_result(result.test_result, self.required)
    }

    pub fn result_value(&self) -> RuleResultValue {
        self.summary.result_value()
    }

    pub fn implementation_score(&self) -> i32 {
        self.summary.implementation_score()
    }

    pub fn implementation_value(&self) -> ImplementationValue {
        ImplementationValue::from_score(self.implementation_score(), self.summary.manual_checks > 0)
    }

    /// Rule-level messages, most severe first
    pub fn messages(&self) -> Vec<RuleMessage> {
        let s = &self.summary;
        let plural = |n: usize, single: &'static str, many: &'static str| {
            RuleMessage::new(if n == 1 { single } else { many }, Some(n))
        };

        let mut messages = Vec::new();
        if s.failures() == 0 && s.manual_checks == 0 {
            if s.passed == 0 {
                messages.push(RuleMessage::new("NOT_APPLICABLE", None));
            } else {
                messages.push(RuleMessage::new("ALL_PASS", Some(s.passed)));
            }
        }
        if s.failures() > 0 {
            messages.push(plural(s.failures(), "FAIL_S", "FAIL_P"));
        }
        if s.manual_checks > 0 {
            messages.push(plural(s.manual_checks, "MANUAL_CHECK_S", "MANUAL_CHECK_P"));
        }
        if s.hidden > 0 {
            messages.push(plural(s.hidden, "HIDDEN_S", "HIDDEN_P"));
        }
        messages
    }

    /// The most severe message
    pub fn message(&self) -> RuleMessage {
        self.messages()
            .into_iter()
            .next()
            .unwrap_or_else(|| RuleMessage::new("NOT_APPLICABLE", None))
    }
}
