use super::dictionary::GlossIndex;
use super::resolver::{can_unblock, resolver_for, StateMap};
use crate::profile::PracticeTracker;
use crate::types::gloss::{GlossRef, LearningState, PracticeMode, TaskType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

/// A gloss picked for the next task, with the state it was picked in.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DueGloss {
    pub reference: GlossRef,
    pub state: LearningState,
}

/// Owns the session's state map. All mutation goes through the transition methods.
#[derive(Debug, Clone)]
pub struct PracticeState<'a> {
    index: &'a GlossIndex,
    state_map: StateMap,
    last_shown: Option<GlossRef>,
}

impl<'a> PracticeState<'a> {
    /// Resolves `goal_ref` with the resolver for `mode`.
    pub fn new(
        goal_ref: &str,
        mode: PracticeMode,
        index: &'a GlossIndex,
        tracker: Option<&dyn PracticeTracker>,
    ) -> Self {
        let state_map = resolver_for(mode).resolve_tree(goal_ref, index, tracker);
        Self::from_state_map(index, state_map)
    }

    /// Glosses whose parts were all practiced earlier are promoted straight away.
    pub fn from_state_map(index: &'a GlossIndex, state_map: StateMap) -> Self {
        let mut state = PracticeState {
            index,
            state_map,
            last_shown: None,
        };
        state.unblock_glosses();
        state
    }

    pub fn state_map(&self) -> &StateMap {
        &self.state_map
    }

    pub fn state_of(&self, reference: &str) -> Option<LearningState> {
        self.state_map.get(reference).copied()
    }

    pub fn last_shown(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }

    /// Uniform pick among introducible and practicing glosses, never the one
    /// shown last. `None` means nothing is left to practice.
    pub fn get_due_gloss<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<DueGloss> {
        let pool: Vec<(&GlossRef, &LearningState)> = self
            .state_map
            .iter()
            .filter(|(_, state)| state.is_due())
            .filter(|(reference, _)| self.last_shown.as_ref() != Some(*reference))
            .collect();

        let (reference, state) = pool.choose(rng)?;
        let due = DueGloss {
            reference: (*reference).clone(),
            state: **state,
        };
        self.last_shown = Some(due.reference.clone());
        Some(due)
    }

    /// Introduction tasks advance VOCAB-TO-INTRODUCE on exposure alone; completion
    /// tasks retire VOCAB-TO-PRACTICE only on a correct recall. Every call ends
    /// with an unblock sweep.
    pub fn handle_gloss_completion(
        &mut self,
        reference: &str,
        task_type: TaskType,
        remembered_correctly: Option<bool>,
    ) {
        let Some(current) = self.state_of(reference) else {
            return;
        };

        let next = match current {
            LearningState::VocabToIntroduce if task_type.is_introduction() => {
                Some(LearningState::VocabToPractice)
            }
            LearningState::VocabToPractice
                if task_type.is_completion() && remembered_correctly == Some(true) =>
            {
                Some(LearningState::Done)
            }
            _ => None,
        };

        if let Some(next) = next {
            debug!(gloss = reference, task = %task_type, from = %current, to = %next, "gloss transition");
            self.state_map.insert(reference.to_string(), next);
        }
        self.unblock_glosses();
    }

    /// Retires a gloss no task can be built for, so it cannot stall the session.
    pub fn set_gloss_invalid(&mut self, reference: &str) {
        match self.state_of(reference) {
            Some(LearningState::FinalChallenge) => {
                warn!(gloss = reference, "refusing to invalidate the final challenge");
                return;
            }
            Some(state) => {
                debug!(gloss = reference, from = %state, "gloss invalidated");
                self.state_map.insert(reference.to_string(), LearningState::Done);
            }
            None => {}
        }
        self.unblock_glosses();
    }

    pub fn final_challenges(&self) -> Vec<GlossRef> {
        self.state_map
            .iter()
            .filter(|(_, state)| **state == LearningState::FinalChallenge)
            .map(|(reference, _)| reference.clone())
            .collect()
    }

    /// Promotes blocked glosses whose parts are satisfied until a pass changes
    /// nothing.
    fn unblock_glosses(&mut self) -> UnblockSweep {
        let mut promoted = 0;
        let mut passes = 0;
        loop {
            passes += 1;
            let blocked: Vec<GlossRef> = self
                .state_map
                .iter()
                .filter(|(_, state)| **state == LearningState::VocabBlocked)
                .map(|(reference, _)| reference.clone())
                .collect();

            let mut changed = false;
            for reference in blocked {
                if can_unblock(&reference, self.index, &self.state_map) {
                    self.state_map
                        .insert(reference, LearningState::VocabToIntroduce);
                    promoted += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        if promoted > 0 {
            debug!(promoted, passes, "unblock sweep");
        }
        UnblockSweep { promoted, passes }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UnblockSweep {
    promoted: usize,
    passes: usize,
}
