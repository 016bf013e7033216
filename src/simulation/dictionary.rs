//*** START FILE: src/simulation/dictionary.rs ***//
use crate::types::gloss::{GlossRef, NormalizedGloss};
use std::collections::HashMap;

/// Position of a gloss inside the index arena.
pub type GlossId = u32;

/// Read-only arena of the session's glosses.
/// Refs are resolved to ids once; relations stay as refs and are looked up on demand.
#[derive(Debug, Default, Clone)]
pub struct GlossIndex {
    ref_to_id: HashMap<GlossRef, GlossId>,
    glosses: Vec<NormalizedGloss>,
}

impl GlossIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from normalized glosses. Anonymous glosses are dropped,
    /// and a later record with the same ref replaces the earlier one.
    pub fn from_glosses(glosses: impl IntoIterator<Item = NormalizedGloss>) -> Self {
        let mut index = GlossIndex::new();
        for gloss in glosses {
            let Some(reference) = gloss.r#ref.clone() else {
                continue;
            };
            match index.ref_to_id.get(&reference) {
                Some(&id) => index.glosses[id as usize] = gloss,
                None => {
                    let id = index.glosses.len() as GlossId;
                    index.ref_to_id.insert(reference, id);
                    index.glosses.push(gloss);
                }
            }
        }
        index
    }

    pub fn id_of(&self, reference: &str) -> Option<GlossId> {
        self.ref_to_id.get(reference).copied()
    }

    pub fn by_id(&self, id: GlossId) -> Option<&NormalizedGloss> {
        self.glosses.get(id as usize)
    }

    pub fn get(&self, reference: &str) -> Option<&NormalizedGloss> {
        self.id_of(reference).and_then(|id| self.by_id(id))
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.ref_to_id.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.glosses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glosses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedGloss> {
        self.glosses.iter()
    }

    /// Resolves refs, silently skipping dangling ones.
    pub fn resolve_all<'a>(
        &'a self,
        refs: &'a [GlossRef],
    ) -> impl Iterator<Item = &'a NormalizedGloss> + 'a {
        refs.iter().filter_map(move |r| self.get(r))
    }

    pub fn translations_of<'a>(
        &'a self,
        gloss: &'a NormalizedGloss,
    ) -> impl Iterator<Item = &'a NormalizedGloss> + 'a {
        self.resolve_all(&gloss.translations)
    }

    /// Translations whose own language matches `language`.
    pub fn translations_in<'a>(
        &'a self,
        gloss: &'a NormalizedGloss,
        language: &'a str,
    ) -> Vec<&'a NormalizedGloss> {
        self.translations_of(gloss)
            .filter(|t| t.language == language)
            .collect()
    }

    pub fn has_translation_in(&self, gloss: &NormalizedGloss, language: &str) -> bool {
        self.translations_of(gloss).any(|t| t.language == language)
    }

    pub fn usage_examples_of<'a>(&'a self, gloss: &'a NormalizedGloss) -> Vec<&'a NormalizedGloss> {
        self.resolve_all(&gloss.usage_examples).collect()
    }

    pub fn parts_of<'a>(&'a self, gloss: &'a NormalizedGloss) -> Vec<&'a NormalizedGloss> {
        self.resolve_all(&gloss.parts).collect()
    }
}

//*** END FILE: src/simulation/dictionary.rs ***//
