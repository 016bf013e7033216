//! Sentence-based tasks: introducing a gloss through usage examples, and
//! decoding one example around a target-language focus gloss.

use super::helpers::{
    example_sample_size, examples_translated_into, pick_random, random_translations, take_random,
    MAX_SURFACED,
};
use super::{ExamplePair, SentenceAroundGloss, SentenceDrill, SentencePart, TaskPayload};
use crate::simulation::dictionary::GlossIndex;
use crate::types::gloss::{NormalizedGloss, TaskContext};
use rand::RngCore;

const MIN_EXAMPLES: usize = 2;

/// Pairs each example with one random translation into `language`; examples
/// without one are dropped.
fn pair_examples(
    examples: &[&NormalizedGloss],
    index: &GlossIndex,
    language: &str,
    rng: &mut dyn RngCore,
) -> Vec<ExamplePair> {
    let chosen = take_random(examples, example_sample_size(examples.len()), &mut *rng);
    chosen
        .into_iter()
        .filter_map(|example| {
            let translation = random_translations(example, index, language, 1, &mut *rng)
                .into_iter()
                .next()?;
            Some(ExamplePair {
                example: example.clone(),
                translation,
            })
        })
        .collect()
}

// UnderstandNativeFromSentence: a native gloss is met through the usage
// examples of one of its target translations.

fn translations_with_examples<'a>(
    gloss: &'a NormalizedGloss,
    index: &'a GlossIndex,
    context: &'a TaskContext,
) -> Vec<&'a NormalizedGloss> {
    index
        .translations_in(gloss, &context.target_iso)
        .into_iter()
        .filter(|translation| {
            examples_translated_into(translation, index, &context.native_iso).len() >= MIN_EXAMPLES
        })
        .collect()
}

pub fn native_from_sentence_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    let Some(gloss) = index.get(reference) else {
        return false;
    };
    gloss.language == context.native_iso && !translations_with_examples(gloss, index, context).is_empty()
}

pub fn make_native_from_sentence(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    let gloss = index.get(reference)?;
    let candidates = translations_with_examples(gloss, index, context);
    let translation = *pick_random(&candidates, rng)?;

    let usable = examples_translated_into(translation, index, &context.native_iso);
    let examples = pair_examples(&usable, index, &context.native_iso, rng);
    if examples.len() < MIN_EXAMPLES {
        return None;
    }

    let translations = random_translations(gloss, index, &context.target_iso, MAX_SURFACED, rng);
    if translations.is_empty() {
        return None;
    }

    Some(TaskPayload::Sentence(SentenceDrill {
        gloss: gloss.clone(),
        translations,
        examples,
    }))
}

// UnderstandTargetFromSentence: a target gloss is met through its own usage
// examples, each glossed back into the native language.

pub fn target_from_sentence_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    let Some(gloss) = index.get(reference) else {
        return false;
    };
    gloss.language == context.target_iso
        && index.has_translation_in(gloss, &context.native_iso)
        && examples_translated_into(gloss, index, &context.native_iso).len() >= MIN_EXAMPLES
}

pub fn make_target_from_sentence(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    let gloss = index.get(reference)?;
    let usable = examples_translated_into(gloss, index, &context.native_iso);
    if usable.len() < MIN_EXAMPLES {
        return None;
    }

    let examples = pair_examples(&usable, index, &context.native_iso, rng);
    if examples.len() < MIN_EXAMPLES {
        return None;
    }

    let translations = random_translations(gloss, index, &context.native_iso, MAX_SURFACED, rng);
    if translations.is_empty() {
        return None;
    }

    Some(TaskPayload::Sentence(SentenceDrill {
        gloss: gloss.clone(),
        translations,
        examples,
    }))
}

// UnderstandSentenceAroundTargetGloss

/// The example has parts, a native translation, contains the focus among its
/// resolved parts, and every resolved part has a native translation.
fn example_frames_focus(
    example: &NormalizedGloss,
    focus: &NormalizedGloss,
    index: &GlossIndex,
    native_iso: &str,
) -> bool {
    if example.parts.is_empty() || !index.has_translation_in(example, native_iso) {
        return false;
    }
    let parts = index.parts_of(example);
    if parts.is_empty() || !parts.iter().any(|part| part.r#ref == focus.r#ref) {
        return false;
    }
    parts
        .iter()
        .all(|part| index.has_translation_in(part, native_iso))
}

fn framing_examples<'a>(
    focus: &'a NormalizedGloss,
    index: &'a GlossIndex,
    native_iso: &str,
) -> Vec<&'a NormalizedGloss> {
    index
        .usage_examples_of(focus)
        .into_iter()
        .filter(|example| example_frames_focus(example, focus, index, native_iso))
        .collect()
}

pub fn sentence_around_gloss_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    let Some(focus) = index.get(reference) else {
        return false;
    };
    focus.language == context.target_iso
        && !framing_examples(focus, index, &context.native_iso).is_empty()
}

pub fn make_sentence_around_gloss(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    let focus = index.get(reference)?;
    let native = context.native_iso.as_str();

    let candidates = framing_examples(focus, index, native);
    let example = *pick_random(&candidates, rng)?;

    let example_translations = random_translations(example, index, native, MAX_SURFACED, rng);
    if example_translations.is_empty() {
        return None;
    }

    let other_parts: Vec<SentencePart> = index
        .parts_of(example)
        .into_iter()
        .filter(|part| part.r#ref != focus.r#ref)
        .map(|part| SentencePart {
            gloss: part.clone(),
            translations: random_translations(part, index, native, MAX_SURFACED, &mut *rng),
        })
        .filter(|part| !part.translations.is_empty())
        .collect();
    if other_parts.is_empty() {
        return None;
    }

    let focus_translations = random_translations(focus, index, native, MAX_SURFACED, rng);
    if focus_translations.is_empty() {
        return None;
    }

    Some(TaskPayload::SentenceAroundGloss(SentenceAroundGloss {
        focus_gloss: focus.clone(),
        example: example.clone(),
        example_translations,
        other_parts,
        focus_translations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gloss(
        reference: &str,
        language: &str,
        translations: &[&str],
        parts: &[&str],
        usage_examples: &[&str],
    ) -> NormalizedGloss {
        let refs = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        NormalizedGloss {
            r#ref: Some(reference.to_string()),
            content: reference.to_string(),
            language: language.to_string(),
            translations: refs(translations),
            parts: refs(parts),
            usage_examples: refs(usage_examples),
            ..Default::default()
        }
    }

    fn context() -> TaskContext {
        TaskContext::new("eng", "spa")
    }

    /// `gato` (spa) with examples s1, s2 (both translated), s3 (untranslated).
    fn corpus() -> GlossIndex {
        GlossIndex::from_glosses(vec![
            gloss("en:cat", "eng", &["gato"], &[], &[]),
            gloss("gato", "spa", &["en:cat"], &[], &["s1", "s2", "s3"]),
            gloss("s1", "spa", &["en:s1"], &["el", "gato"], &[]),
            gloss("s2", "spa", &["en:s2"], &["gato", "duerme"], &[]),
            gloss("s3", "spa", &[], &["gato"], &[]),
            gloss("en:s1", "eng", &[], &[], &[]),
            gloss("en:s2", "eng", &[], &[], &[]),
            gloss("el", "spa", &["en:the"], &[], &[]),
            gloss("en:the", "eng", &[], &[], &[]),
            gloss("duerme", "spa", &[], &[], &[]),
        ])
    }

    #[test]
    fn native_gloss_borrows_examples_from_its_translation() {
        let index = corpus();
        assert!(native_from_sentence_possible("en:cat", &index, &context()));
        assert!(!native_from_sentence_possible("gato", &index, &context()));

        let mut rng = StdRng::seed_from_u64(9);
        let Some(TaskPayload::Sentence(drill)) =
            make_native_from_sentence("en:cat", &index, &context(), &mut rng)
        else {
            panic!("expected a sentence drill");
        };
        assert_eq!(drill.examples.len(), 2);
        assert!(drill.examples.iter().all(|pair| pair.translation.language == "eng"));
        assert_eq!(drill.translations[0].r#ref.as_deref(), Some("gato"));
    }

    #[test]
    fn target_gloss_uses_its_own_examples() {
        let index = corpus();
        assert!(target_from_sentence_possible("gato", &index, &context()));
        let mut rng = StdRng::seed_from_u64(1);
        let payload = make_target_from_sentence("gato", &index, &context(), &mut rng).unwrap();
        let TaskPayload::Sentence(drill) = payload else {
            panic!("expected a sentence drill");
        };
        let refs: Vec<_> = drill.examples.iter().filter_map(|p| p.example.r#ref.clone()).collect();
        assert!(!refs.contains(&"s3".to_string()));
    }

    #[test]
    fn one_translated_example_is_not_enough() {
        let index = GlossIndex::from_glosses(vec![
            gloss("gato", "spa", &["en:cat"], &[], &["s1", "s3"]),
            gloss("en:cat", "eng", &[], &[], &[]),
            gloss("s1", "spa", &["en:s1"], &[], &[]),
            gloss("en:s1", "eng", &[], &[], &[]),
            gloss("s3", "spa", &[], &[], &[]),
        ]);
        assert!(!target_from_sentence_possible("gato", &index, &context()));
    }

    #[test]
    fn sentence_around_gloss_needs_every_part_translated() {
        let index = corpus();
        // s2 contains "duerme", which has no translation; only s1 qualifies.
        assert!(sentence_around_gloss_possible("gato", &index, &context()));
        let mut rng = StdRng::seed_from_u64(4);
        let Some(TaskPayload::SentenceAroundGloss(task)) =
            make_sentence_around_gloss("gato", &index, &context(), &mut rng)
        else {
            panic!("expected a sentence-around-gloss task");
        };
        assert_eq!(task.example.r#ref.as_deref(), Some("s1"));
        assert_eq!(task.other_parts.len(), 1);
        assert_eq!(task.other_parts[0].gloss.r#ref.as_deref(), Some("el"));
        assert_eq!(task.focus_translations[0].r#ref.as_deref(), Some("en:cat"));
    }

    #[test]
    fn focus_as_the_only_part_is_admissible_but_not_constructible() {
        let index = GlossIndex::from_glosses(vec![
            gloss("gato", "spa", &["en:cat"], &[], &["s"]),
            gloss("en:cat", "eng", &[], &[], &[]),
            gloss("s", "spa", &["en:s"], &["gato"], &[]),
            gloss("en:s", "eng", &[], &[], &[]),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sentence_around_gloss_possible("gato", &index, &context()));
        assert!(make_sentence_around_gloss("gato", &index, &context(), &mut rng).is_none());
    }
}
