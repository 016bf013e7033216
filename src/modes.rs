use crate::types::gloss::{LearningState, PracticeMode, TaskType};

/// Task types a mode offers in each phase of a gloss's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTaskConfig {
    pub novel_task_types: &'static [TaskType],
    pub practicing_task_types: &'static [TaskType],
    pub final_task_type: TaskType,
}

const PROCEDURAL: ModeTaskConfig = ModeTaskConfig {
    novel_task_types: &[TaskType::MemorizeFromNative, TaskType::UnderstandNativeFromSentence],
    practicing_task_types: &[TaskType::FormSentence, TaskType::RecallFromNative],
    final_task_type: TaskType::ChallengeTryToExpress,
};

const UNDERSTAND: ModeTaskConfig = ModeTaskConfig {
    novel_task_types: &[TaskType::MemorizeFromTarget, TaskType::UnderstandTargetFromSentence],
    practicing_task_types: &[
        TaskType::UnderstandSentenceAroundTargetGloss,
        TaskType::RecallFromTarget,
    ],
    final_task_type: TaskType::ChallengeTryToUnderstand,
};

pub fn task_types_for_mode(mode: PracticeMode) -> &'static ModeTaskConfig {
    match mode {
        PracticeMode::Procedural => &PROCEDURAL,
        PracticeMode::Understand => &UNDERSTAND,
    }
}

impl ModeTaskConfig {
    /// Candidates for a due gloss; empty for states that are never due.
    pub fn for_state(&self, state: LearningState) -> &'static [TaskType] {
        match state {
            LearningState::VocabToIntroduce => self.novel_task_types,
            LearningState::VocabToPractice => self.practicing_task_types,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn novel_types_are_introductions() {
        for mode in [PracticeMode::Procedural, PracticeMode::Understand] {
            let config = task_types_for_mode(mode);
            assert!(config.novel_task_types.iter().all(TaskType::is_introduction));
            assert!(config.practicing_task_types.iter().any(TaskType::is_completion));
        }
    }

    #[test]
    fn blocked_state_has_no_task_types() {
        let config = task_types_for_mode(PracticeMode::Understand);
        assert!(config.for_state(LearningState::VocabBlocked).is_empty());
        assert_eq!(
            config.for_state(LearningState::VocabToIntroduce),
            config.novel_task_types
        );
    }
}
