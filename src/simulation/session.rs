use super::dictionary::GlossIndex;
use super::practice_state::PracticeState;
use crate::error::{GlosswalkError, Result};
use crate::modes::task_types_for_mode;
use crate::profile::PracticeTracker;
use crate::tasks::{build_task_for_gloss, build_task_of_type, BuiltTask};
use crate::types::gloss::{GlossRef, LearningState, PracticeMode, SituationGoals, TaskContext};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Caps the tasks shown in one session. Retiring an untaskable gloss does not count.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Supplies the learner's self-assessment for an emitted task.
pub trait OutcomeSource {
    fn outcome(&mut self, task: &BuiltTask, rng: &mut dyn RngCore) -> Option<bool>;
}

/// Fair coin for self-assessment task types, no outcome for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedOutcomes;

impl OutcomeSource for SimulatedOutcomes {
    fn outcome(&mut self, task: &BuiltTask, rng: &mut dyn RngCore) -> Option<bool> {
        if task.task_type.is_self_assessment() {
            Some(rng.gen_bool(0.5))
        } else {
            None
        }
    }
}

/// Outcomes from a caller-supplied closure, e.g. a terminal prompt.
pub struct CallbackOutcomes<F>(pub F);

impl<F> OutcomeSource for CallbackOutcomes<F>
where
    F: FnMut(&BuiltTask) -> Option<bool>,
{
    fn outcome(&mut self, task: &BuiltTask, _rng: &mut dyn RngCore) -> Option<bool> {
        (self.0)(task)
    }
}

/// One pass of the session loop. `task` is `None` when nothing could be built
/// for the gloss and it was retired instead; such a step keeps the iteration
/// number of the last task shown.
#[derive(Serialize, Debug, Clone)]
pub struct SessionStep {
    pub iteration: usize,
    pub gloss_ref: GlossRef,
    pub task: Option<BuiltTask>,
    pub outcome: Option<bool>,
    pub before: LearningState,
    pub after: LearningState,
}

#[derive(Serialize, Debug, Clone)]
pub struct SessionReport {
    pub mode: PracticeMode,
    pub goal_ref: GlossRef,
    pub steps: Vec<SessionStep>,
    pub final_task: Option<BuiltTask>,
    pub hit_iteration_cap: bool,
}

impl SessionReport {
    pub fn invalidated(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .filter(|step| step.task.is_none())
            .map(|step| step.gloss_ref.as_str())
    }
}

/// Drives one goal from resolution to its final challenge.
#[derive(Debug, Clone)]
pub struct SessionDriver<'a> {
    index: &'a GlossIndex,
    context: TaskContext,
    mode: PracticeMode,
    max_iterations: usize,
}

impl<'a> SessionDriver<'a> {
    pub fn new(index: &'a GlossIndex, context: TaskContext, mode: PracticeMode) -> Self {
        SessionDriver {
            index,
            context,
            mode,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Runs the session to completion. A tracker, when given, seeds the
    /// resolver and records every gloss a task was shown for.
    pub fn run(
        &self,
        goal_ref: &str,
        outcomes: &mut dyn OutcomeSource,
        mut tracker: Option<&mut dyn PracticeTracker>,
        rng: &mut dyn RngCore,
    ) -> SessionReport {
        let config = task_types_for_mode(self.mode);
        let mut state = PracticeState::new(goal_ref, self.mode, self.index, tracker.as_deref());
        info!(goal = goal_ref, mode = %self.mode, glosses = state.state_map().len(), "session started");

        let mut report = SessionReport {
            mode: self.mode,
            goal_ref: goal_ref.to_string(),
            steps: Vec::new(),
            final_task: None,
            hit_iteration_cap: false,
        };

        let mut iteration = 0;
        while iteration < self.max_iterations {
            let Some(due) = state.get_due_gloss(&mut *rng) else {
                report.final_task =
                    build_task_of_type(config.final_task_type, goal_ref, self.index, &self.context, &mut *rng);
                if report.final_task.is_none() {
                    warn!(goal = goal_ref, task = %config.final_task_type, "final challenge could not be built");
                }
                info!(goal = goal_ref, steps = report.steps.len(), "session finished");
                return report;
            };

            let candidates = config.for_state(due.state);
            let task = build_task_for_gloss(&due.reference, candidates, self.index, &self.context, &mut *rng);

            let outcome = match &task {
                Some(task) => {
                    iteration += 1;
                    let outcome = outcomes.outcome(task, &mut *rng);
                    state.handle_gloss_completion(&due.reference, task.task_type, outcome);
                    if let Some(tracker) = tracker.as_deref_mut() {
                        tracker.record_practice(&due.reference);
                    }
                    outcome
                }
                None => {
                    state.set_gloss_invalid(&due.reference);
                    None
                }
            };

            let after = state.state_of(&due.reference).unwrap_or(due.state);
            debug!(iteration, gloss = %due.reference, from = %due.state, to = %after, "session step");
            report.steps.push(SessionStep {
                iteration,
                gloss_ref: due.reference,
                task,
                outcome,
                before: due.state,
                after,
            });
        }

        error!(
            goal = goal_ref,
            max_iterations = self.max_iterations,
            "session hit its iteration cap without reaching the final challenge"
        );
        report.hit_iteration_cap = true;
        report
    }
}

/// Picks the mode and goal for a simulated run. Missing choices are drawn at
/// random from the situation goals: first a mode that has goals, then a goal.
pub fn choose_goal<R: Rng + ?Sized>(
    goals: &SituationGoals,
    mode: Option<PracticeMode>,
    goal: Option<&str>,
    rng: &mut R,
) -> Result<(PracticeMode, GlossRef)> {
    let mode = match mode {
        Some(mode) => mode,
        None => match goal {
            // A named goal without a mode keeps the production reading.
            Some(_) => PracticeMode::Procedural,
            None => *goals.available_modes().choose(rng).ok_or_else(|| {
                GlosswalkError::Config("no situation goals are available to simulate".to_string())
            })?,
        },
    };

    let goal_ref = match goal {
        Some(goal) => goal.to_string(),
        None => goals
            .for_mode(mode)
            .choose(rng)
            .map(|goal| goal.final_challenge.clone())
            .ok_or_else(|| GlosswalkError::Config(format!("no situation goals for mode {mode}")))?,
    };
    Ok((mode, goal_ref))
}

/// Debug entry point: runs a goal with simulated outcomes and returns every
/// transition for inspection.
pub fn simulate_goal(
    index: &GlossIndex,
    context: &TaskContext,
    goals: &SituationGoals,
    mode: Option<PracticeMode>,
    goal: Option<&str>,
    max_iterations: usize,
    rng: &mut dyn RngCore,
) -> Result<SessionReport> {
    let (mode, goal_ref) = choose_goal(goals, mode, goal, &mut *rng)?;
    if !index.contains(&goal_ref) {
        return Err(GlosswalkError::UnknownGoal(goal_ref));
    }

    let driver = SessionDriver::new(index, context.clone(), mode).with_max_iterations(max_iterations);
    Ok(driver.run(&goal_ref, &mut SimulatedOutcomes, None, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PracticeStore;
    use crate::types::gloss::{NormalizedGloss, PracticeGoal, TaskType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gloss(reference: &str, language: &str, translations: &[&str], parts: &[&str]) -> NormalizedGloss {
        NormalizedGloss {
            r#ref: Some(reference.to_string()),
            content: reference.to_string(),
            language: language.to_string(),
            translations: translations.iter().map(|s| s.to_string()).collect(),
            parts: parts.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// G = [A, B], B = [A]; every Spanish gloss has an English translation.
    fn corpus() -> GlossIndex {
        GlossIndex::from_glosses(vec![
            gloss("G", "spa", &["en:G"], &["A", "B"]),
            gloss("A", "spa", &["en:A"], &[]),
            gloss("B", "spa", &["en:B"], &["A"]),
            gloss("en:G", "eng", &["G"], &[]),
            gloss("en:A", "eng", &["A"], &[]),
            gloss("en:B", "eng", &["B"], &[]),
        ])
    }

    fn context() -> TaskContext {
        TaskContext::new("eng", "spa")
    }

    #[test]
    fn simulated_session_ends_with_the_final_challenge() {
        let index = corpus();
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let driver = SessionDriver::new(&index, context(), PracticeMode::Understand);
            let report = driver.run("G", &mut SimulatedOutcomes, None, &mut rng);

            assert!(!report.hit_iteration_cap, "seed {seed}");
            let final_task = report.final_task.expect("final challenge");
            assert_eq!(final_task.task_type, TaskType::ChallengeTryToUnderstand);
            assert_eq!(final_task.gloss_ref, "G");
            assert!(report.steps.iter().all(|step| step.gloss_ref != "G"));
        }
    }

    #[test]
    fn steps_never_move_a_gloss_backwards() {
        let index = corpus();
        let mut rng = StdRng::seed_from_u64(3);
        let driver = SessionDriver::new(&index, context(), PracticeMode::Understand);
        let report = driver.run("G", &mut SimulatedOutcomes, None, &mut rng);
        let rank = |state: LearningState| match state {
            LearningState::VocabBlocked => 0,
            LearningState::VocabToIntroduce => 1,
            LearningState::VocabToPractice => 2,
            LearningState::Done => 3,
            LearningState::FinalChallenge => 4,
        };
        for step in &report.steps {
            assert!(rank(step.after) >= rank(step.before), "{step:?}");
            assert_ne!(step.after, LearningState::VocabBlocked);
        }
        // The first step can only be A: B starts blocked behind it.
        assert_eq!(report.steps[0].gloss_ref, "A");
        assert_eq!(report.steps[0].after, LearningState::VocabToPractice);
    }

    #[test]
    fn non_self_assessment_tasks_get_no_outcome() {
        let index = corpus();
        let mut rng = StdRng::seed_from_u64(8);
        let driver = SessionDriver::new(&index, context(), PracticeMode::Understand);
        let report = driver.run("G", &mut SimulatedOutcomes, None, &mut rng);
        for step in &report.steps {
            if let Some(task) = &step.task {
                if !task.task_type.is_self_assessment() {
                    assert_eq!(step.outcome, None);
                }
            }
        }
    }

    #[test]
    fn untaskable_gloss_is_invalidated_and_the_session_continues() {
        let mut glosses = vec![gloss("C", "spa", &[], &[])];
        glosses.push(gloss("G", "spa", &["en:G"], &["A", "C"]));
        glosses.push(gloss("A", "spa", &["en:A"], &[]));
        glosses.push(gloss("en:G", "eng", &[], &[]));
        glosses.push(gloss("en:A", "eng", &[], &[]));
        let index = GlossIndex::from_glosses(glosses);

        let mut rng = StdRng::seed_from_u64(1);
        let driver = SessionDriver::new(&index, context(), PracticeMode::Understand);
        let report = driver.run("G", &mut SimulatedOutcomes, None, &mut rng);
        assert!(report.invalidated().any(|reference| reference == "C"));
        assert!(report.final_task.is_some());
    }

    #[test]
    fn never_remembering_hits_the_iteration_cap() {
        let index = corpus();
        let mut rng = StdRng::seed_from_u64(0);
        let mut never = CallbackOutcomes(|_: &BuiltTask| Some(false));
        let driver = SessionDriver::new(&index, context(), PracticeMode::Understand).with_max_iterations(40);
        let report = driver.run("G", &mut never, None, &mut rng);
        assert!(report.hit_iteration_cap);
        assert!(report.final_task.is_none());
        assert_eq!(report.steps.len(), 40);
    }

    #[test]
    fn retiring_untaskable_glosses_does_not_use_up_iterations() {
        // Only A and the goal can be drilled; X and Y have no translations.
        let index = GlossIndex::from_glosses(vec![
            gloss("G", "spa", &["en:G"], &["A", "X", "Y"]),
            gloss("A", "spa", &["en:A"], &[]),
            gloss("X", "spa", &[], &[]),
            gloss("Y", "spa", &[], &[]),
            gloss("en:G", "eng", &["G"], &[]),
            gloss("en:A", "eng", &["A"], &[]),
        ]);
        let mut rng = StdRng::seed_from_u64(2);
        let mut always = CallbackOutcomes(|_: &BuiltTask| Some(true));
        let driver = SessionDriver::new(&index, context(), PracticeMode::Understand).with_max_iterations(2);
        let report = driver.run("G", &mut always, None, &mut rng);

        let retired: Vec<&str> = report.invalidated().collect();
        assert_eq!(retired.len(), 2);
        assert!(!report.hit_iteration_cap);
        assert!(report.final_task.is_some());
        let shown = report.steps.iter().filter(|step| step.task.is_some()).count();
        assert!(report.steps.len() > 2);
        assert!(report.steps.iter().all(|step| step.iteration <= shown));
    }

    #[test]
    fn missing_goal_ends_without_a_final_task() {
        let index = corpus();
        let mut rng = StdRng::seed_from_u64(0);
        let driver = SessionDriver::new(&index, context(), PracticeMode::Procedural);
        let report = driver.run("nowhere", &mut SimulatedOutcomes, None, &mut rng);
        assert!(report.steps.is_empty());
        assert!(report.final_task.is_none());
        assert!(!report.hit_iteration_cap);
    }

    #[test]
    fn tracker_records_every_shown_gloss() {
        let index = corpus();
        let mut store = PracticeStore::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut always = CallbackOutcomes(|_: &BuiltTask| Some(true));
        let driver = SessionDriver::new(&index, context(), PracticeMode::Understand);
        let report = driver.run("G", &mut always, Some(&mut store), &mut rng);
        for step in report.steps.iter().filter(|step| step.task.is_some()) {
            assert!(store.has_been_practiced(&step.gloss_ref));
        }
        assert!(!store.has_been_practiced("G"));
    }

    #[test]
    fn goal_choice_falls_back_to_situation_goals() {
        let goals = SituationGoals {
            procedural: Vec::new(),
            understand: vec![PracticeGoal {
                final_challenge: "G".to_string(),
                need_to_be_learned: Vec::new(),
            }],
        };
        let mut rng = StdRng::seed_from_u64(2);
        let (mode, goal) = choose_goal(&goals, None, None, &mut rng).unwrap();
        assert_eq!(mode, PracticeMode::Understand);
        assert_eq!(goal, "G");

        assert!(choose_goal(&goals, Some(PracticeMode::Procedural), None, &mut rng).is_err());
        assert!(choose_goal(&SituationGoals::default(), None, None, &mut rng).is_err());
        let (mode, goal) = choose_goal(&SituationGoals::default(), None, Some("X"), &mut rng).unwrap();
        assert_eq!((mode, goal.as_str()), (PracticeMode::Procedural, "X"));
    }

    #[test]
    fn simulate_goal_rejects_goals_outside_the_corpus() {
        let index = corpus();
        let mut rng = StdRng::seed_from_u64(0);
        let result = simulate_goal(
            &index,
            &context(),
            &SituationGoals::default(),
            Some(PracticeMode::Understand),
            Some("missing"),
            DEFAULT_MAX_ITERATIONS,
            &mut rng,
        );
        assert!(matches!(result, Err(GlosswalkError::UnknownGoal(goal)) if goal == "missing"));
    }
}
