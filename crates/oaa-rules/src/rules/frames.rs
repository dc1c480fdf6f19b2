//! Frame Rules

use oaa_cache::ClassificationCache;

use super::{dom, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const FRAME_1: Rule = Rule {
    id: "FRAME_1",
    scope: RuleScope::Element,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "2.4.1",
    wcag_related_ids: &["4.1.2"],
    target_resources: &["frame", "iframe"],
    summary: "Frames must have an accessible name",
    validate: validate_frame_name,
};

pub const FRAME_2: Rule = Rule {
    id: "FRAME_2",
    scope: RuleScope::Element,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "2.4.1",
    wcag_related_ids: &["4.1.2"],
    target_resources: &["frame", "iframe"],
    summary: "Frame names must describe the frame content",
    validate: validate_frame_content,
};

fn validate_frame_name(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for frame in cache.frames() {
        let de = dom(cache, frame)?;
        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, frame, "ELEMENT_HIDDEN_1", vec![de.tag_name.clone()]);
        } else if de.accessible_name.has_name() {
            out.add(TestResult::Pass, frame, "ELEMENT_PASS_1", vec![de.accessible_name.name.clone()]);
        } else if let Some(ids) = unresolved_labels(de) {
            out.add(TestResult::ManualCheck, frame, "ELEMENT_MC_1", vec![ids]);
        } else {
            out.add(TestResult::Fail, frame, "ELEMENT_FAIL_1", vec![de.tag_name.clone()]);
        }
    }
    Ok(())
}

/// Content of other origins cannot be inspected
fn validate_frame_content(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for frame in cache.frames() {
        let de = dom(cache, frame)?;
        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, frame, "ELEMENT_HIDDEN_1", vec![de.tag_name.clone()]);
        } else if frame.is_cross_domain {
            out.add(TestResult::ManualCheck, frame, "ELEMENT_MC_2", vec![frame.src.clone()]);
        } else if de.accessible_name.has_name() {
            out.add(
                TestResult::ManualCheck,
                frame,
                "ELEMENT_MC_1",
                vec![de.accessible_name.name.clone()],
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{outcomes, run};
    use oaa_html::HtmlParser;
    use pretty_assertions::assert_eq;

    const HTML: &str = r#"<body>
        <iframe src="/a.html" title="Calendar"></iframe>
        <iframe src="/b.html"></iframe>
        <iframe src="https://other.example.org/c" title="Ad"></iframe>
        <iframe src="/d.html" title="Hidden" style="display:none"></iframe>
        </body>"#;

    #[test]
    fn test_frame_names() {
        let d = HtmlParser::new().parse_with_url(HTML, "https://example.com/").unwrap();
        let results = run(&FRAME_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::Pass, "ELEMENT_PASS_1"),
                (TestResult::Fail, "ELEMENT_FAIL_1"),
                (TestResult::Pass, "ELEMENT_PASS_1"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
            ]
        );
        assert_eq!(results[0].params, vec!["Calendar"]);
    }

    #[test]
    fn test_frame_content() {
        let d = HtmlParser::new().parse_with_url(HTML, "https://example.com/").unwrap();
        let results = run(&FRAME_2, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::ManualCheck, "ELEMENT_MC_2"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
            ]
        );
    }

    #[test]
    fn test_frame_dangling_labelledby() {
        let d = HtmlParser::new()
            .parse(r#"<body><iframe src="/a.html" aria-labelledby="gone"></iframe></body>"#)
            .unwrap();
        let results = run(&FRAME_1, &d);
        assert_eq!(outcomes(&results), vec![(TestResult::ManualCheck, "ELEMENT_MC_1")]);
        assert_eq!(results[0].params, vec!["gone"]);
    }
}
