//! Comprehensive tests for oaa-rules
//!
//! Runs the whole built-in catalog over realistic pages.

use std::collections::HashSet;

use oaa_cache::{ClassificationCache, EventProcessing};
use oaa_dom::Document;
use oaa_rules::{
    ElementResult, RuleCategory, RuleRegistry, RuleScope, RulesetManager, TestResult,
};

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head><title>Quarterly report</title></head>
<body>
  <a href="#content">Skip to content</a>
  <nav aria-label="Primary"><a href="/">Home</a><a href="/about">About</a></nav>
  <main id="content" tabindex="-1">
    <h1>Quarterly report</h1>
    <p style="color:#949494;background-color:#ffffff">Low contrast note</p>
    <p lang="fr">Bonjour</p>
    <img src="chart.png" alt="Revenue chart">
    <img src="spacer.gif" alt="">
    <table>
      <caption>Revenue</caption>
      <tr><th>Quarter</th><th>Amount</th></tr>
      <tr><td>Q1</td><td>10</td></tr>
    </table>
    <table><tr><td>Layout</td><td>cells</td></tr></table>
    <form aria-label="Search">
      <label for="q">Query</label><input id="q" type="text">
      <input type="text">
    </form>
    <div role="button" onclick="go()">Go</div>
    <video controls src="talk.mp4"></video>
    <marquee>News</marquee>
    <iframe src="https://other.example.com/widget" title="Weather"></iframe>
  </main>
</body>
</html>"##;

fn document(html: &str) -> Document {
    oaa_html::parse(html).unwrap()
}

type RuleRun = (&'static str, RuleScope, Vec<ElementResult>);

fn run_all(doc: &Document) -> Vec<RuleRun> {
    let registry = RuleRegistry::builtin().unwrap();
    let cache = ClassificationCache::build(doc, EventProcessing::FaeUtil);
    registry
        .get_all()
        .iter()
        .map(|rule| (rule.id, rule.scope, rule.evaluate(&cache).unwrap()))
        .collect()
}

#[test]
fn test_catalog_is_consistent() {
    let registry = RuleRegistry::builtin().unwrap();
    let mut ids = HashSet::new();
    for rule in registry.get_all() {
        assert!(ids.insert(rule.id), "duplicate id {}", rule.id);
        assert_ne!(rule.category, RuleCategory::UNDEFINED, "{} has no category", rule.id);
        assert_eq!(rule.wcag_primary_id.split('.').count(), 3, "{}", rule.id);
        assert!(!rule.summary.is_empty());
    }
}

#[test]
fn test_builtin_rulesets_cover_catalog() {
    let registry = RuleRegistry::builtin().unwrap();
    let rulesets = RulesetManager::builtin(&registry).unwrap();
    assert_eq!(rulesets.ids().collect::<Vec<_>>(), vec!["WCAG20_ARIA_TRANS", "TEST"]);

    let wcag = rulesets.lookup("WCAG20_ARIA_TRANS").unwrap();
    for rule in registry.get_all() {
        assert!(wcag.is_enabled(rule.id), "{} not enabled", rule.id);
    }
    assert!(wcag.is_required("COLOR_1"));
    assert!(!wcag.is_required("HEADING_1"));
}

#[test]
fn test_page_rules_emit_one_page_result() {
    for html in [PAGE, "<body></body>", "<body><p>Plain</p></body>"] {
        let doc = document(html);
        for (id, scope, results) in run_all(&doc) {
            let pages = results.iter().filter(|r| r.target.is_page()).count();
            match scope {
                RuleScope::Page => assert_eq!(pages, 1, "{id} on {html:.30}"),
                _ => assert_eq!(pages, 0, "{id} reported a page result"),
            }
        }
    }
}

#[test]
fn test_one_result_per_element_per_rule() {
    let doc = document(PAGE);
    for (id, _, results) in run_all(&doc) {
        let mut seen = HashSet::new();
        for result in results.iter().filter(|r| !r.target.is_page()) {
            assert!(
                seen.insert(result.target.ordinal_position),
                "{id} reported {} twice",
                result.target.elem_name
            );
        }
    }
}

fn results_of<'a>(all: &'a [RuleRun], id: &str) -> &'a [ElementResult] {
    &all.iter().find(|(rule, _, _)| *rule == id).unwrap().2
}

fn page_key(all: &[RuleRun], id: &str) -> String {
    results_of(all, id)
        .iter()
        .find(|r| r.target.is_page())
        .unwrap()
        .message_key
        .clone()
}

#[test]
fn test_realistic_page_outcomes() {
    let doc = document(PAGE);
    let all = run_all(&doc);
    let of = |id| results_of(&all, id);
    let page = |id| page_key(&all, id);

    assert_eq!(page("TITLE_1"), "PAGE_MC_1");
    assert_eq!(page("LANGUAGE_1"), "PAGE_PASS_1");
    assert_eq!(page("HEADING_1"), "PAGE_PASS_1");
    assert_eq!(page("LANDMARK_1"), "PAGE_PASS_1");
    assert_eq!(page("BYPASS_1"), "PAGE_PASS_1");
    assert_eq!(page("TIMING_1"), "PAGE_MC_1");

    let colour = of("COLOR_1");
    assert!(colour.iter().any(|r| r.test_result == TestResult::Fail && r.params == vec!["3.0"]));

    let images: Vec<_> = of("IMAGE_1").iter().map(|r| r.test_result).collect();
    assert_eq!(images, vec![TestResult::Pass]);

    let controls: Vec<_> = of("CONTROL_1").iter().map(|r| r.test_result).collect();
    assert_eq!(controls, vec![TestResult::Pass, TestResult::Fail]);

    let click = &of("WIDGET_2")[0];
    assert_eq!(click.message_key, "ELEMENT_FAIL_2");
    assert_eq!(click.params, vec!["div", "button"]);

    assert_eq!(of("TABLE_2")[0].message_key, "ELEMENT_PASS_1");
    assert_eq!(of("LAYOUT_2")[0].message_key, "ELEMENT_PASS_1");
    assert_eq!(of("VIDEO_1")[0].message_key, "ELEMENT_MC_2");
    assert_eq!(of("FRAME_2")[0].message_key, "ELEMENT_MC_2");

    let moving = of("TIMING_2");
    assert!(moving.iter().all(|r| !r.target.is_page()));
    assert!(
        moving
            .iter()
            .any(|r| r.target.tag_name == "marquee" && r.test_result == TestResult::ManualCheck)
    );
}

#[test]
fn test_evaluation_is_deterministic() {
    let doc = document(PAGE);
    let first = run_all(&doc);
    let second = run_all(&doc);
    for ((id, _, a), (_, _, b)) in first.iter().zip(&second) {
        let keys = |rs: &[ElementResult]| {
            rs.iter()
                .map(|r| (r.target.ordinal_position, r.message_key.clone(), r.params.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(a), keys(b), "{id} differs between runs");
    }
}
