//! Translation drills: memorize, recall, form-sentence and the two final challenges.

use super::helpers::{random_translations, MAX_SURFACED};
use super::{TaskPayload, TranslationDrill};
use crate::simulation::dictionary::GlossIndex;
use crate::types::gloss::TaskContext;
use rand::RngCore;

/// Source gloss in `from`, with at least one translation into `to`.
fn drill_possible(reference: &str, index: &GlossIndex, from: &str, to: &str) -> bool {
    index
        .get(reference)
        .map_or(false, |gloss| gloss.language == from && index.has_translation_in(gloss, to))
}

fn make_drill(
    reference: &str,
    index: &GlossIndex,
    to: &str,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    let gloss = index.get(reference)?;
    let translations = random_translations(gloss, index, to, MAX_SURFACED, rng);
    if translations.is_empty() {
        return None;
    }
    Some(TaskPayload::Translation(TranslationDrill {
        gloss: gloss.clone(),
        translations,
    }))
}

pub fn native_to_target_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    drill_possible(reference, index, &context.native_iso, &context.target_iso)
}

pub fn make_native_to_target(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    make_drill(reference, index, &context.target_iso, rng)
}

pub fn target_to_native_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    drill_possible(reference, index, &context.target_iso, &context.native_iso)
}

pub fn make_target_to_native(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    make_drill(reference, index, &context.native_iso, rng)
}

// The goal's own language is not checked for the challenges, only that a
// translation in the other working language exists.

pub fn challenge_express_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    index
        .get(reference)
        .map_or(false, |gloss| index.has_translation_in(gloss, &context.target_iso))
}

pub fn make_challenge_express(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    make_drill(reference, index, &context.target_iso, rng)
}

pub fn challenge_understand_possible(reference: &str, index: &GlossIndex, context: &TaskContext) -> bool {
    index
        .get(reference)
        .map_or(false, |gloss| index.has_translation_in(gloss, &context.native_iso))
}

pub fn make_challenge_understand(
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<TaskPayload> {
    make_drill(reference, index, &context.native_iso, rng)
}
