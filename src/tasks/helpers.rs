use crate::simulation::dictionary::GlossIndex;
use crate::types::gloss::NormalizedGloss;
use rand::seq::SliceRandom;
use rand::Rng;

/// Most translations or examples a task surfaces at once.
pub const MAX_SURFACED: usize = 3;

/// Up to `count` distinct items in random order.
pub fn take_random<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    items.choose_multiple(rng, count).cloned().collect()
}

pub fn pick_random<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    items.choose(rng)
}

/// Up to `limit` translations of `gloss` into `language`, owned for a payload.
pub fn random_translations<R: Rng + ?Sized>(
    gloss: &NormalizedGloss,
    index: &GlossIndex,
    language: &str,
    limit: usize,
    rng: &mut R,
) -> Vec<NormalizedGloss> {
    let candidates = index.translations_in(gloss, language);
    candidates
        .choose_multiple(rng, limit)
        .map(|g| (*g).clone())
        .collect()
}

/// Usage examples that carry at least one translation into `language`.
pub fn examples_translated_into<'a>(
    gloss: &'a NormalizedGloss,
    index: &'a GlossIndex,
    language: &str,
) -> Vec<&'a NormalizedGloss> {
    index
        .usage_examples_of(gloss)
        .into_iter()
        .filter(|example| index.has_translation_in(example, language))
        .collect()
}

/// How many examples a sentence task shows: at least two, at most three.
pub fn example_sample_size(available: usize) -> usize {
    available.min(MAX_SURFACED).max(2)
}
