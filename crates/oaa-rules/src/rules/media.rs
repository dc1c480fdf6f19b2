//! Audio and Video Alternatives

use oaa_cache::{ClassificationCache, Inspectable, MediaElement, MediaType};

use super::dom;
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const AUDIO_1: Rule = Rule {
    id: "AUDIO_1",
    scope: RuleScope::Element,
    category: RuleCategory::AUDIO_VIDEO,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "1.2.1",
    wcag_related_ids: &[],
    target_resources: &["audio", "track"],
    summary: "Prerecorded audio needs a text transcript",
    validate: validate_audio,
};

pub const VIDEO_1: Rule = Rule {
    id: "VIDEO_1",
    scope: RuleScope::Element,
    category: RuleCategory::AUDIO_VIDEO,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "1.2.1",
    wcag_related_ids: &["1.2.2", "1.2.4"],
    target_resources: &["video", "track"],
    summary: "Video needs captions or a text alternative",
    validate: validate_video,
};

fn of_type<'c>(
    cache: &'c ClassificationCache<'_>,
    kind: MediaType,
) -> impl Iterator<Item = &'c MediaElement> {
    cache.media().iter().filter(move |m| m.media_type == kind)
}

/// What `aria-describedby` on a media element points at
enum DescribedBy {
    /// Referenced elements carry text
    Text,
    /// No text found and these ids match nothing
    Unresolved(String),
    None,
}

fn described_by(cache: &ClassificationCache<'_>, media: &MediaElement) -> Result<DescribedBy, RuleError> {
    let Some(ids) = cache.attr(media.element_ref().index, "aria-describedby") else {
        return Ok(DescribedBy::None);
    };
    let tree = cache.document().tree();
    let has_text = ids
        .split_whitespace()
        .filter_map(|id| cache.element_by_id(id))
        .filter_map(|index| cache.element(index))
        .any(|referenced| !tree.text_content(referenced.node).trim().is_empty());
    if has_text {
        return Ok(DescribedBy::Text);
    }
    let unresolved = &dom(cache, media)?.unresolved_description_ids;
    if unresolved.is_empty() {
        Ok(DescribedBy::None)
    } else {
        Ok(DescribedBy::Unresolved(unresolved.join(" ")))
    }
}

fn validate_audio(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for audio in of_type(cache, MediaType::Audio) {
        if !dom(cache, audio)?.is_visible_to_at() {
            out.add(TestResult::Hidden, audio, "ELEMENT_HIDDEN_1", Vec::new());
        } else if !audio.tracks.is_empty() {
            out.add(TestResult::Pass, audio, "ELEMENT_PASS_1", Vec::new());
        } else {
            match described_by(cache, audio)? {
                DescribedBy::Text => out.add(TestResult::Pass, audio, "ELEMENT_PASS_2", Vec::new()),
                DescribedBy::Unresolved(ids) => {
                    out.add(TestResult::ManualCheck, audio, "ELEMENT_MC_1", vec![ids])
                }
                DescribedBy::None => out.add(TestResult::Fail, audio, "ELEMENT_FAIL_1", Vec::new()),
            }
        }
    }
    Ok(())
}

fn validate_video(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for video in of_type(cache, MediaType::Video) {
        if !dom(cache, video)?.is_visible_to_at() {
            out.add(TestResult::Hidden, video, "ELEMENT_HIDDEN_1", Vec::new());
        } else if !video.tracks.is_empty() {
            let kinds = video
                .tracks
                .iter()
                .map(|t| t.kind.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            out.add(TestResult::Pass, video, "ELEMENT_PASS_1", vec![kinds]);
        } else {
            match described_by(cache, video)? {
                DescribedBy::Text => out.add(TestResult::ManualCheck, video, "ELEMENT_MC_1", Vec::new()),
                DescribedBy::Unresolved(ids) => {
                    out.add(TestResult::ManualCheck, video, "ELEMENT_MC_3", vec![ids])
                }
                DescribedBy::None => out.add(TestResult::ManualCheck, video, "ELEMENT_MC_2", Vec::new()),
            }
        }
    }
    Ok(())
}
