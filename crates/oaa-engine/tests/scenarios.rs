//! Scenario tests - full pipeline from HTML to evaluation result
//!
//! HTML → DOM → classification cache → rules → aggregation → JSON

use oaa_engine::cache::ClassificationCache;
use oaa_engine::dom::Document;
use oaa_engine::rules::{
    ResultCollector, Rule, RuleCategory, RuleError, RuleGroup, RuleRegistry, RuleScope, Ruleset,
    RulesetManager, TestResult,
};
use oaa_engine::{
    ConfigError, ElementResultValue, EvaluationResult, EvaluatorFactory, ImplementationValue,
    RuleExecution, RuleResultValue,
};
use pretty_assertions::assert_eq;

const URL: &str = "https://example.com/page";

fn evaluate(html: &str) -> EvaluationResult {
    let factory = EvaluatorFactory::new().unwrap();
    factory.new_evaluator().unwrap().evaluate_html(html, URL).unwrap()
}

/// Builtin rules under a one-off ruleset with the given required flags
fn factory_with(required: &[(&str, bool)]) -> EvaluatorFactory {
    let registry = RuleRegistry::builtin().unwrap();
    let mappings: serde_json::Map<String, serde_json::Value> = required
        .iter()
        .map(|(id, req)| (id.to_string(), serde_json::json!({"required": req, "enabled": true})))
        .collect();
    let json = serde_json::json!({
        "ruleset_id": "SCENARIO",
        "version": "1.0",
        "last_updated": "2024-01-01",
        "author": "Scenario tests",
        "title": "Scenario",
        "rule_mappings": mappings,
    });
    let mut rulesets = RulesetManager::new();
    rulesets
        .add(Ruleset::from_json(&json.to_string()).unwrap(), &registry)
        .unwrap();
    EvaluatorFactory::with_rulesets(registry, rulesets)
}

// ============================================================================
// COLOUR CONTRAST
// ============================================================================

#[test]
fn test_contrast_pass() {
    let result = evaluate(r#"<body><p style="color:#575757;background-color:#ffffff">Readable</p></body>"#);
    let rule = result.rule_result("COLOR_1").unwrap();
    assert_eq!(rule.result_value(), RuleResultValue::Pass);
    assert_eq!(rule.element_results()[0].params, vec!["7.2"]);
    assert_eq!(rule.implementation_score(), 100);
    assert_eq!(rule.implementation_value(), ImplementationValue::Complete);
}

#[test]
fn test_contrast_fail() {
    let result = evaluate(r#"<body><p style="color:#949494;background-color:#ffffff">Faint</p></body>"#);
    let rule = result.rule_result("COLOR_1").unwrap();
    assert!(rule.is_required());
    assert_eq!(rule.result_value(), RuleResultValue::Violation);

    let element = &rule.element_results()[0];
    assert_eq!(element.test_result, TestResult::Fail);
    assert_eq!(element.params, vec!["3.0"]);
    assert_eq!(rule.element_value(element), ElementResultValue::Violation);
    assert_eq!(rule.implementation_score(), 0);
}

#[test]
fn test_contrast_behind_background_image() {
    let result = evaluate(
        r#"<body><div style="background-image:url(texture.png)"><p style="color:#949494">Over an image</p></div></body>"#,
    );
    let rule = result.rule_result("COLOR_1").unwrap();
    assert_eq!(rule.result_value(), RuleResultValue::ManualCheck);
    assert_eq!(rule.summary().violations, 0);
}

// ============================================================================
// SKIP LINKS
// ============================================================================

#[test]
fn test_skip_link_to_focusable_target() {
    let factory = factory_with(&[("BYPASS_1", true)]);
    let result = factory
        .new_evaluator()
        .unwrap()
        .evaluate_html(
            r##"<body><a href="#main">Skip to content</a><nav><a href="/">Home</a></nav>
            <main id="main" tabindex="-1"><h1>Title</h1></main></body>"##,
            URL,
        )
        .unwrap();
    let rule = result.rule_result("BYPASS_1").unwrap();
    let page = rule.element_results().iter().find(|r| r.target.is_page()).unwrap();
    assert_eq!(page.test_result, TestResult::Pass);
    assert_eq!(rule.result_value(), RuleResultValue::Pass);
}

#[test]
fn test_skip_link_to_missing_target() {
    let factory = factory_with(&[("BYPASS_1", true)]);
    let result = factory
        .new_evaluator()
        .unwrap()
        .evaluate_html(r##"<body><a href="#nowhere">Skip</a><p>Content</p></body>"##, URL)
        .unwrap();
    let rule = result.rule_result("BYPASS_1").unwrap();
    let page = rule.element_results().iter().find(|r| r.target.is_page()).unwrap();
    assert_eq!(page.message_key, "PAGE_FAIL_1");
    assert_eq!(page.params, vec!["nowhere"]);
    assert_eq!(rule.element_value(page), ElementResultValue::Violation);
    assert_eq!(rule.result_value(), RuleResultValue::Violation);
}

// ============================================================================
// LAYOUT
// ============================================================================

#[test]
fn test_single_column_layout_table() {
    let result = evaluate("<body><table><tr><td>Only</td></tr><tr><td>column</td></tr></table></body>");
    let rule = result.rule_result("LAYOUT_1").unwrap();
    let element = rule.element_results().iter().find(|r| !r.target.is_page()).unwrap();
    assert_eq!(element.test_result, TestResult::Pass);
    assert_eq!(element.message_key, "ELEMENT_PASS_1");
    assert_eq!(element.target.tag_name, "table");
}

// ============================================================================
// AGGREGATION LAWS
// ============================================================================

fn images(with_alt: usize, without_alt: usize) -> String {
    let mut html = String::from("<body>");
    for i in 0..with_alt {
        html.push_str(&format!(r#"<img src="{i}.png" alt="Photo {i}">"#));
    }
    for i in 0..without_alt {
        html.push_str(&format!(r#"<img src="missing{i}.png">"#));
    }
    html.push_str("</body>");
    html
}

#[test]
fn test_clamp_law() {
    let result = evaluate(&images(199, 1));
    let rule = result.rule_result("IMAGE_1").unwrap();
    assert_eq!(rule.summary().passed, 199);
    assert_eq!(rule.summary().violations, 1);
    assert_eq!(rule.implementation_score(), 99);
    assert_eq!(rule.implementation_value(), ImplementationValue::AlmostComplete);
}

#[test]
fn test_single_failure_dominates() {
    let result = evaluate(&images(9, 1));
    let rule = result.rule_result("IMAGE_1").unwrap();
    assert_eq!(rule.result_value(), RuleResultValue::Violation);
    assert_eq!(rule.implementation_score(), 90);
    assert_eq!(rule.message().key, "FAIL_S");
}

#[test]
fn test_score_is_monotonic_in_passes() {
    let mut previous = -1;
    for passes in 0..8 {
        let result = evaluate(&images(passes, 2));
        let score = result.rule_result("IMAGE_1").unwrap().implementation_score();
        assert!(score >= previous, "{passes} passes scored {score} after {previous}");
        previous = score;
    }
}

#[test]
fn test_recommended_failure_is_warning() {
    let result = evaluate("<body><h1>Title</h1><h2></h2></body>");
    let rule = result.rule_result("HEADING_2").unwrap();
    assert!(!rule.is_required());
    assert_eq!(rule.result_value(), RuleResultValue::Warning);
    assert_eq!(rule.summary().warnings, 1);
}

#[test]
fn test_group_queries() {
    let result = evaluate(
        r#"<html lang="en"><head><title>Groups</title></head>
        <body><main><h1>Title</h1><img src="a.png"><p style="color:#949494">Faint</p></main></body></html>"#,
    );

    let styles = result.by_category(RuleCategory::STYLES_READABILITY, RuleGroup::GROUP123);
    assert!(styles.rule_results().iter().any(|r| r.rule_id() == "COLOR_1"));
    assert!(styles.summary().violations >= 1);

    let guideline = result.by_guideline("1.1", RuleGroup::GROUP123);
    assert_eq!(guideline.len(), 1);
    assert_eq!(guideline.rule_results()[0].rule_id(), "IMAGE_1");

    let pages = result.by_scope(RuleScope::Page);
    assert!(pages.rule_results().iter().all(|r| r.rule().scope == RuleScope::Page));

    let all = result.all_rules();
    assert_eq!(all.len(), result.rule_results().len());
    let counted = {
        let s = all.summary();
        s.violations + s.warnings + s.manual_checks + s.passed + s.not_applicable + s.failed
    };
    assert_eq!(counted, all.len());
    assert!(result.category_groups(RuleGroup::GROUP123).iter().all(|g| !g.is_empty()));
    assert!(result.guideline_groups(RuleGroup::GROUP123).iter().any(|g| g.rule_results()[0].rule_id() == "COLOR_1"));
}

#[test]
fn test_group_queries_respect_rule_group_filter() {
    let result = evaluate(
        r#"<html lang="en"><head><title>Filter</title></head>
        <body><main><h1>Title</h1><section aria-label="News">n</section></main></body></html>"#,
    );

    let landmarks = result.by_category(RuleCategory::LANDMARKS, RuleGroup::GROUP123);
    assert!(!landmarks.is_empty());
    assert!(result.by_category(RuleCategory::LANDMARKS, RuleGroup::GROUP1).is_empty());
    assert_eq!(
        result.by_category(RuleCategory::LANDMARKS, RuleGroup::GROUP2).len(),
        landmarks.len()
    );

    let group1 = result.category_groups(RuleGroup::GROUP1);
    assert!(
        group1
            .iter()
            .flat_map(|g| g.rule_results())
            .all(|r| r.rule().group.intersects(RuleGroup::GROUP1))
    );
    assert!(
        result
            .guideline_groups(RuleGroup::GROUP3)
            .iter()
            .all(|g| g.rule_results().iter().all(|r| r.rule().group == RuleGroup::GROUP3))
    );
}

#[test]
fn test_element_results_take_highest_value() {
    let result = evaluate(
        r#"<html lang="en"><head><title>Elements</title></head>
        <body><main><h1>Title</h1><a href="/x"><img id="logo" src="logo.png"></a></main></body></html>"#,
    );
    let elements = result.element_results(RuleGroup::GROUP123);

    let ordinals: Vec<u32> = elements.iter().map(|e| e.ordinal_position).collect();
    let mut sorted = ordinals.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(ordinals, sorted);

    let page = elements.iter().find(|e| e.tag_name == "page").unwrap();
    assert_eq!(page.ordinal_position, 1);

    let image = elements.iter().find(|e| e.tag_name == "img").unwrap();
    assert!(image.rule_ids.contains(&"IMAGE_1"));
    assert_eq!(image.highest, ElementResultValue::Violation);

    let heading = elements.iter().find(|e| e.tag_name == "h1").unwrap();
    let values: Vec<ElementResultValue> = result
        .rule_results()
        .iter()
        .flat_map(|r| r.element_results().iter().map(move |e| (r, e)))
        .filter(|(_, e)| e.target.ordinal_position == heading.ordinal_position)
        .map(|(r, e)| r.element_value(e))
        .collect();
    assert_eq!(Some(heading.highest), values.into_iter().max());

    // GROUP3 rules never look at images
    let keyboard_only = result.element_results(RuleGroup::GROUP3);
    assert!(keyboard_only.iter().all(|e| e.tag_name != "img"));
}

// ============================================================================
// DEGENERATE INPUT AND CONFIGURATION
// ============================================================================

#[test]
fn test_document_without_body() {
    let factory = EvaluatorFactory::new().unwrap();
    let result = factory.new_evaluator().unwrap().evaluate(&Document::empty(URL));
    assert!(result.rule_results().is_empty());
    assert_eq!(result.all_rules().summary().implementation_value, ImplementationValue::NotApplicable);
}

#[test]
fn test_evaluation_is_deterministic() {
    let html = r##"<html lang="en"><head><title>Same</title></head><body>
        <a href="#c">Skip</a><main id="c"><h1>Same</h1><img src="x.png">
        <table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table></main></body></html>"##;
    let factory = EvaluatorFactory::new().unwrap();
    let evaluator = factory.new_evaluator().unwrap();
    let document = oaa_engine::html::HtmlParser::new().parse_with_url(html, URL).unwrap();

    let first = evaluator.evaluate_at(&document, 1_700_000_000).to_json(true).unwrap();
    let second = evaluator.evaluate_at(&document, 1_700_000_000).to_json(true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_configuration_errors_fail_fast() {
    let mut factory = EvaluatorFactory::new().unwrap();
    assert!(matches!(factory.set_parameter("ruleset", "WCAG99"), Err(ConfigError::Ruleset(_))));
    assert!(matches!(factory.set_feature("groups", "9"), Err(ConfigError::GroupOutOfRange(_))));
    assert!(matches!(factory.set_feature("speed", "fast"), Err(ConfigError::UnknownFeature(_))));

    factory.set_feature("groups", "1").unwrap();
    let result = factory.new_evaluator().unwrap().evaluate_html("<body><p>x</p></body>", URL).unwrap();
    assert!(result.rule_results().iter().all(|r| r.rule().group.intersects(RuleGroup::GROUP1)));
}

// ============================================================================
// RULE FAILURE ISOLATION
// ============================================================================

fn explode(
    _cache: &ClassificationCache<'_>,
    _out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    panic!("procedure exploded")
}

fn broken(
    _cache: &ClassificationCache<'_>,
    _out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    Err(RuleError::Internal("lookup failed".to_string()))
}

const EXPLODE_1: Rule = Rule {
    id: "EXPLODE_1",
    scope: RuleScope::Element,
    category: RuleCategory::IMAGES,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "1.1.1",
    wcag_related_ids: &[],
    target_resources: &["img"],
    summary: "Always panics",
    validate: explode,
};

const BROKEN_1: Rule = Rule {
    id: "BROKEN_1",
    summary: "Always errors",
    validate: broken,
    ..EXPLODE_1
};

#[test]
fn test_failing_rules_are_isolated() {
    let mut registry = RuleRegistry::new();
    registry.register(EXPLODE_1).unwrap();
    registry.register(BROKEN_1).unwrap();
    registry.register(oaa_engine::rules::rules::images::IMAGE_1).unwrap();

    let json = r#"{
        "ruleset_id": "ISOLATION", "version": "1.0", "last_updated": "2024-01-01",
        "author": "Scenario tests", "title": "Isolation",
        "rule_mappings": {
            "EXPLODE_1": {"required": true, "enabled": true},
            "BROKEN_1": {"required": true, "enabled": true},
            "IMAGE_1": {"required": true, "enabled": true}
        }
    }"#;
    let mut rulesets = RulesetManager::new();
    rulesets.add(Ruleset::from_json(json).unwrap(), &registry).unwrap();
    let factory = EvaluatorFactory::with_rulesets(registry, rulesets);

    let result = factory
        .new_evaluator()
        .unwrap()
        .evaluate_html(r#"<body><img src="a.png" alt="A"></body>"#, URL)
        .unwrap();

    let ids: Vec<_> = result.rule_results().iter().map(|r| r.rule_id()).collect();
    assert_eq!(ids, vec!["EXPLODE_1", "BROKEN_1", "IMAGE_1"]);

    let exploded = result.rule_result("EXPLODE_1").unwrap();
    assert_eq!(
        exploded.execution(),
        &RuleExecution::Failed { message: "procedure exploded".to_string() }
    );
    let failed = result.rule_result("BROKEN_1").unwrap();
    assert_eq!(
        failed.execution(),
        &RuleExecution::Failed { message: "lookup failed".to_string() }
    );

    let image = result.rule_result("IMAGE_1").unwrap();
    assert_eq!(image.result_value(), RuleResultValue::Pass);

    // Failed rules stay out of the score
    let summary = *result.all_rules().summary();
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.implementation_score, 100);

    let export: serde_json::Value = serde_json::from_str(&result.to_json(false).unwrap()).unwrap();
    assert_eq!(export["rule_results"][0]["execution_error"], "procedure exploded");
}
