use super::sentence::{
    make_native_from_sentence, make_sentence_around_gloss, make_target_from_sentence,
    native_from_sentence_possible, sentence_around_gloss_possible, target_from_sentence_possible,
};
use super::translation::{
    challenge_express_possible, challenge_understand_possible, make_challenge_express,
    make_challenge_understand, make_native_to_target, make_target_to_native,
    native_to_target_possible, target_to_native_possible,
};
use super::{BuiltTask, TaskPayload};
use crate::simulation::dictionary::GlossIndex;
use crate::types::gloss::{TaskContext, TaskType};
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

pub type PossibleFn = fn(&str, &GlossIndex, &TaskContext) -> bool;
pub type MakeFn = fn(&str, &GlossIndex, &TaskContext, &mut dyn RngCore) -> Option<TaskPayload>;

/// One catalog entry. Adding a task type means adding an entry here.
#[derive(Debug, Clone, Copy)]
pub struct TaskDefinition {
    pub task_type: TaskType,
    /// Opaque handle for the presentation layer.
    pub presentation: &'static str,
    pub is_possible_to_make: PossibleFn,
    pub make_task: MakeFn,
}

// Entries are in `TaskType` declaration order so a task type indexes its entry.
pub static TASK_REGISTRY: [TaskDefinition; 10] = [
    TaskDefinition {
        task_type: TaskType::MemorizeFromNative,
        presentation: "memorize-from-native",
        is_possible_to_make: native_to_target_possible,
        make_task: make_native_to_target,
    },
    TaskDefinition {
        task_type: TaskType::MemorizeFromTarget,
        presentation: "memorize-from-target",
        is_possible_to_make: target_to_native_possible,
        make_task: make_target_to_native,
    },
    TaskDefinition {
        task_type: TaskType::RecallFromNative,
        presentation: "recall-from-native",
        is_possible_to_make: native_to_target_possible,
        make_task: make_native_to_target,
    },
    TaskDefinition {
        task_type: TaskType::RecallFromTarget,
        presentation: "recall-from-target",
        is_possible_to_make: target_to_native_possible,
        make_task: make_target_to_native,
    },
    TaskDefinition {
        task_type: TaskType::FormSentence,
        presentation: "form-sentence",
        is_possible_to_make: native_to_target_possible,
        make_task: make_native_to_target,
    },
    TaskDefinition {
        task_type: TaskType::UnderstandNativeFromSentence,
        presentation: "understand-native-from-sentence",
        is_possible_to_make: native_from_sentence_possible,
        make_task: make_native_from_sentence,
    },
    TaskDefinition {
        task_type: TaskType::UnderstandTargetFromSentence,
        presentation: "understand-target-from-sentence",
        is_possible_to_make: target_from_sentence_possible,
        make_task: make_target_from_sentence,
    },
    TaskDefinition {
        task_type: TaskType::UnderstandSentenceAroundTargetGloss,
        presentation: "understand-sentence-around-target-gloss",
        is_possible_to_make: sentence_around_gloss_possible,
        make_task: make_sentence_around_gloss,
    },
    TaskDefinition {
        task_type: TaskType::ChallengeTryToExpress,
        presentation: "challenge-try-to-express",
        is_possible_to_make: challenge_express_possible,
        make_task: make_challenge_express,
    },
    TaskDefinition {
        task_type: TaskType::ChallengeTryToUnderstand,
        presentation: "challenge-try-to-understand",
        is_possible_to_make: challenge_understand_possible,
        make_task: make_challenge_understand,
    },
];

pub fn task_definition(task_type: TaskType) -> &'static TaskDefinition {
    &TASK_REGISTRY[task_type as usize]
}

impl TaskDefinition {
    /// Admissibility first, then construction; either failing yields `None`.
    pub fn build(
        &self,
        reference: &str,
        index: &GlossIndex,
        context: &TaskContext,
        rng: &mut dyn RngCore,
    ) -> Option<BuiltTask> {
        if !(self.is_possible_to_make)(reference, index, context) {
            return None;
        }
        let payload = (self.make_task)(reference, index, context, rng)?;
        Some(BuiltTask {
            task_type: self.task_type,
            gloss_ref: reference.to_string(),
            presentation: self.presentation,
            payload,
        })
    }
}

pub fn build_task_of_type(
    task_type: TaskType,
    reference: &str,
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<BuiltTask> {
    task_definition(task_type).build(reference, index, context, rng)
}

/// Tries the candidate types in random order and returns the first task that
/// can be built. `None` means the gloss has no admissible task.
pub fn build_task_for_gloss(
    reference: &str,
    candidates: &[TaskType],
    index: &GlossIndex,
    context: &TaskContext,
    rng: &mut dyn RngCore,
) -> Option<BuiltTask> {
    let mut order = candidates.to_vec();
    order.shuffle(&mut *rng);

    let task = order
        .into_iter()
        .find_map(|task_type| build_task_of_type(task_type, reference, index, context, &mut *rng));
    match &task {
        Some(task) => debug!(gloss = reference, task = %task.task_type, "task selected"),
        None => debug!(gloss = reference, "no admissible task"),
    }
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::gloss::NormalizedGloss;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gloss(reference: &str, language: &str, translations: &[&str]) -> NormalizedGloss {
        NormalizedGloss {
            r#ref: Some(reference.to_string()),
            content: reference.to_string(),
            language: language.to_string(),
            translations: translations.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn registry_is_indexed_by_task_type() {
        for task_type in TaskType::ALL {
            assert_eq!(task_definition(task_type).task_type, task_type);
        }
    }

    #[test]
    fn untranslated_gloss_is_inadmissible_for_translation_tasks() {
        let index = GlossIndex::from_glosses(vec![gloss("en:x", "eng", &[]), gloss("es:x", "spa", &[])]);
        let context = TaskContext::new("eng", "spa");
        let drills = [
            TaskType::MemorizeFromNative,
            TaskType::MemorizeFromTarget,
            TaskType::RecallFromNative,
            TaskType::RecallFromTarget,
            TaskType::ChallengeTryToExpress,
            TaskType::ChallengeTryToUnderstand,
        ];
        for reference in ["en:x", "es:x"] {
            for task_type in drills {
                let definition = task_definition(task_type);
                assert!(
                    !(definition.is_possible_to_make)(reference, &index, &context),
                    "{task_type} admitted {reference}"
                );
            }
        }
    }

    #[test]
    fn first_buildable_candidate_wins() {
        let index = GlossIndex::from_glosses(vec![
            gloss("en:dog", "eng", &["es:perro"]),
            gloss("es:perro", "spa", &["en:dog"]),
        ]);
        let context = TaskContext::new("eng", "spa");
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            // The sentence task is never buildable here, so the drill always wins.
            let task = build_task_for_gloss(
                "en:dog",
                &[TaskType::MemorizeFromNative, TaskType::UnderstandNativeFromSentence],
                &index,
                &context,
                &mut rng,
            )
            .unwrap();
            assert_eq!(task.task_type, TaskType::MemorizeFromNative);
            assert_eq!(task.presentation, "memorize-from-native");
            assert_eq!(task.gloss_ref, "en:dog");
        }
    }

    #[test]
    fn no_candidate_means_no_task() {
        let index = GlossIndex::from_glosses(vec![gloss("es:solo", "spa", &[])]);
        let context = TaskContext::new("eng", "spa");
        let mut rng = StdRng::seed_from_u64(0);
        assert!(build_task_for_gloss(
            "es:solo",
            &[TaskType::MemorizeFromTarget, TaskType::UnderstandTargetFromSentence],
            &index,
            &context,
            &mut rng,
        )
        .is_none());
    }
}
