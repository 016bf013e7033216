//! Goal-free lessons over the whole corpus: pick one final challenge, then
//! gather the vocabulary around it.

use crate::simulation::dictionary::GlossIndex;
use crate::types::gloss::{NormalizedGloss, TaskContext};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

pub const DEFAULT_LESSON_SIZE: usize = 16;

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Lesson {
    pub final_challenge: Option<NormalizedGloss>,
    pub exercises: Vec<NormalizedGloss>,
}

pub fn extract_collections(index: &GlossIndex) -> Vec<&NormalizedGloss> {
    index.iter().filter(|gloss| gloss.is_collection()).collect()
}

/// Target-language glosses with a translation and at least two parts.
pub fn extract_understanding_challenges<'a>(
    index: &'a GlossIndex,
    target_iso: &str,
) -> Vec<&'a NormalizedGloss> {
    index
        .iter()
        .filter(|gloss| {
            gloss.language == target_iso && !gloss.translations.is_empty() && gloss.parts.len() >= 2
        })
        .collect()
}

/// Native-language glosses with a translation and at least one translated part.
pub fn extract_expression_challenges<'a>(
    index: &'a GlossIndex,
    native_iso: &str,
) -> Vec<&'a NormalizedGloss> {
    index
        .iter()
        .filter(|gloss| gloss.language == native_iso && !gloss.translations.is_empty())
        .filter(|gloss| {
            index
                .parts_of(gloss)
                .iter()
                .any(|part| !part.translations.is_empty())
        })
        .collect()
}

/// Final-challenge candidates. Without a context any translated gloss qualifies.
pub fn challenge_candidates<'a>(
    index: &'a GlossIndex,
    context: Option<&TaskContext>,
) -> Vec<&'a NormalizedGloss> {
    let extracted: Vec<&NormalizedGloss> = match context {
        Some(context) => {
            let mut combined = extract_understanding_challenges(index, &context.target_iso);
            combined.extend(extract_expression_challenges(index, &context.native_iso));
            combined
        }
        None => index
            .iter()
            .filter(|gloss| !gloss.translations.is_empty())
            .collect(),
    };

    let mut seen: HashSet<String> = HashSet::new();
    extracted
        .into_iter()
        .filter(|gloss| !gloss.is_collection())
        .filter(|gloss| {
            gloss
                .ref_str()
                .map_or(false, |reference| seen.insert(reference.to_string()))
        })
        .collect()
}

/// Collects exercises in insertion order, never the challenge, its direct
/// translations, collections, or the same gloss twice.
struct ExerciseSet<'a> {
    index: &'a GlossIndex,
    excluded: HashSet<&'a str>,
    chosen: Vec<&'a NormalizedGloss>,
    chosen_refs: HashSet<&'a str>,
    size: usize,
}

impl<'a> ExerciseSet<'a> {
    fn new(index: &'a GlossIndex, challenge: &'a NormalizedGloss, size: usize) -> Self {
        let mut excluded: HashSet<&str> = challenge.translations.iter().map(String::as_str).collect();
        excluded.extend(challenge.ref_str());
        ExerciseSet {
            index,
            excluded,
            chosen: Vec::new(),
            chosen_refs: HashSet::new(),
            size,
        }
    }

    fn admits(&self, gloss: &NormalizedGloss) -> bool {
        match gloss.ref_str() {
            Some(reference) => {
                !gloss.is_collection()
                    && !self.excluded.contains(reference)
                    && !self.chosen_refs.contains(reference)
            }
            None => false,
        }
    }

    fn add(&mut self, gloss: &'a NormalizedGloss) {
        if !self.admits(gloss) {
            return;
        }
        if let Some(reference) = gloss.ref_str() {
            self.chosen_refs.insert(reference);
            self.chosen.push(gloss);
        }
    }

    /// Every gloss reachable through `parts`. Collections are skipped but
    /// still walked through.
    fn add_parts_of(&mut self, root: &'a NormalizedGloss) {
        let index = self.index;
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut pending: Vec<&'a str> = root.parts.iter().rev().map(String::as_str).collect();

        while let Some(reference) = pending.pop() {
            if !visited.insert(reference) {
                continue;
            }
            let Some(gloss) = index.get(reference) else {
                continue;
            };
            self.add(gloss);
            pending.extend(gloss.parts.iter().rev().map(String::as_str));
        }
    }

    /// Translations of chosen glosses, then glosses built from chosen parts.
    fn related_pool(&self) -> Vec<&'a NormalizedGloss> {
        let index = self.index;
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut pool = Vec::new();

        for &gloss in &self.chosen {
            for translation in index.resolve_all(&gloss.translations) {
                if self.admits(translation) && translation.ref_str().map_or(false, |r| seen.insert(r)) {
                    pool.push(translation);
                }
            }
        }

        for gloss in index.iter() {
            let overlaps = gloss
                .parts
                .iter()
                .any(|part| self.chosen_refs.contains(part.as_str()));
            if overlaps && self.admits(gloss) && gloss.ref_str().map_or(false, |r| seen.insert(r)) {
                pool.push(gloss);
            }
        }
        pool
    }

    fn remaining_pool(&self) -> Vec<&'a NormalizedGloss> {
        self.index.iter().filter(|gloss| self.admits(gloss)).collect()
    }

    fn draw_from<R: Rng + ?Sized>(&mut self, mut pool: Vec<&'a NormalizedGloss>, rng: &mut R) {
        while self.chosen.len() < self.size && !pool.is_empty() {
            let picked = pool.swap_remove(rng.gen_range(0..pool.len()));
            self.add(picked);
        }
    }
}

/// Builds a lesson of at most `size` exercises around one random challenge.
/// Parts of the challenge come first, then related glosses, then anything
/// else eligible in the corpus.
pub fn generate_lesson<R: Rng + ?Sized>(
    index: &GlossIndex,
    context: Option<&TaskContext>,
    size: usize,
    rng: &mut R,
) -> Lesson {
    let candidates = challenge_candidates(index, context);
    let Some(&challenge) = candidates.choose(rng) else {
        debug!(glosses = index.len(), "no final challenge candidates");
        return Lesson::default();
    };

    let mut exercises = ExerciseSet::new(index, challenge, size);
    exercises.add_parts_of(challenge);
    let from_parts = exercises.chosen.len();

    let related = exercises.related_pool();
    exercises.draw_from(related, rng);
    let remaining = exercises.remaining_pool();
    exercises.draw_from(remaining, rng);

    let mut chosen: Vec<NormalizedGloss> = exercises.chosen.into_iter().cloned().collect();
    chosen.shuffle(rng);
    chosen.truncate(size);

    info!(
        challenge = challenge.ref_str().unwrap_or_default(),
        from_parts,
        exercises = chosen.len(),
        "lesson generated"
    );
    Lesson {
        final_challenge: Some(challenge.clone()),
        exercises: chosen,
    }
}
