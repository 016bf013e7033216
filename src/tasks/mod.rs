//! Task catalog: one registry entry per task type, each pairing an
//! admissibility check with a payload constructor and a presentation handle.
//!
//! Language direction is always decided from each gloss's own `language`
//! against the session's [`TaskContext`](crate::types::gloss::TaskContext).

pub mod helpers;
pub mod registry;
pub mod sentence;
pub mod translation;

use crate::types::gloss::{GlossRef, NormalizedGloss, TaskType};
use serde::Serialize;

pub use registry::{build_task_for_gloss, build_task_of_type, task_definition, TaskDefinition, TASK_REGISTRY};

/// A gloss shown with some of its translations.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TranslationDrill {
    pub gloss: NormalizedGloss,
    pub translations: Vec<NormalizedGloss>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExamplePair {
    pub example: NormalizedGloss,
    pub translation: NormalizedGloss,
}

/// A gloss taught through example sentences and their translations.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SentenceDrill {
    pub gloss: NormalizedGloss,
    pub translations: Vec<NormalizedGloss>,
    pub examples: Vec<ExamplePair>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SentencePart {
    pub gloss: NormalizedGloss,
    pub translations: Vec<NormalizedGloss>,
}

/// One example sentence decoded around a focus gloss.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SentenceAroundGloss {
    pub focus_gloss: NormalizedGloss,
    pub example: NormalizedGloss,
    pub example_translations: Vec<NormalizedGloss>,
    pub other_parts: Vec<SentencePart>,
    pub focus_translations: Vec<NormalizedGloss>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskPayload {
    Translation(TranslationDrill),
    Sentence(SentenceDrill),
    SentenceAroundGloss(SentenceAroundGloss),
}

impl TaskPayload {
    /// The gloss the task is about.
    pub fn subject(&self) -> &NormalizedGloss {
        match self {
            TaskPayload::Translation(drill) => &drill.gloss,
            TaskPayload::Sentence(drill) => &drill.gloss,
            TaskPayload::SentenceAroundGloss(task) => &task.focus_gloss,
        }
    }
}

/// A constructed task ready for the presentation layer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BuiltTask {
    pub task_type: TaskType,
    pub gloss_ref: GlossRef,
    /// Passed through untouched to whatever renders the task.
    pub presentation: &'static str,
    pub payload: TaskPayload,
}
