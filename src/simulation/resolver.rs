use super::dictionary::{GlossId, GlossIndex};
use crate::profile::PracticeTracker;
use crate::types::gloss::{GlossRef, LearningState, PracticeMode};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Per-session learning state of every gloss reachable from the goal.
pub type StateMap = BTreeMap<GlossRef, LearningState>;

/// Computes the initial state map for a goal.
pub trait GoalResolver {
    fn resolve_tree(
        &self,
        goal_ref: &str,
        index: &GlossIndex,
        tracker: Option<&dyn PracticeTracker>,
    ) -> StateMap;
}

/// Production goals: the goal's parts plus the parts of each of its translations,
/// since expressing it means building the translated form too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralResolver;

/// Comprehension goals: the goal's parts only.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderstandResolver;

static PROCEDURAL: ProceduralResolver = ProceduralResolver;
static UNDERSTAND: UnderstandResolver = UnderstandResolver;

pub fn resolver_for(mode: PracticeMode) -> &'static dyn GoalResolver {
    match mode {
        PracticeMode::Procedural => &PROCEDURAL,
        PracticeMode::Understand => &UNDERSTAND,
    }
}

impl GoalResolver for ProceduralResolver {
    fn resolve_tree(
        &self,
        goal_ref: &str,
        index: &GlossIndex,
        tracker: Option<&dyn PracticeTracker>,
    ) -> StateMap {
        let Some(mut walker) = PartsWalker::start(goal_ref, index, tracker) else {
            return goal_only(goal_ref);
        };
        let Some(goal) = index.get(goal_ref) else {
            return goal_only(goal_ref);
        };

        for part in &goal.parts {
            walker.visit(part);
        }
        for translation in index.translations_of(goal) {
            for part in &translation.parts {
                walker.visit(part);
            }
        }
        walker.finish(goal_ref)
    }
}

impl GoalResolver for UnderstandResolver {
    fn resolve_tree(
        &self,
        goal_ref: &str,
        index: &GlossIndex,
        tracker: Option<&dyn PracticeTracker>,
    ) -> StateMap {
        let Some(mut walker) = PartsWalker::start(goal_ref, index, tracker) else {
            return goal_only(goal_ref);
        };
        let Some(goal) = index.get(goal_ref) else {
            return goal_only(goal_ref);
        };

        for part in &goal.parts {
            walker.visit(part);
        }
        walker.finish(goal_ref)
    }
}

fn goal_only(goal_ref: &str) -> StateMap {
    let mut state_map = StateMap::new();
    state_map.insert(goal_ref.to_string(), LearningState::FinalChallenge);
    state_map
}

/// Depth-first walk over `parts` edges. The visited set is shared by the whole
/// walk, so a diamond is entered once; `on_path` tells real cycles apart.
struct PartsWalker<'a> {
    index: &'a GlossIndex,
    tracker: Option<&'a dyn PracticeTracker>,
    state_map: StateMap,
    visited: HashSet<GlossId>,
    on_path: HashSet<GlossId>,
    cycles: usize,
}

impl<'a> PartsWalker<'a> {
    fn start(
        goal_ref: &str,
        index: &'a GlossIndex,
        tracker: Option<&'a dyn PracticeTracker>,
    ) -> Option<Self> {
        let Some(goal_id) = index.id_of(goal_ref) else {
            warn!(goal = goal_ref, "goal gloss not found in corpus");
            return None;
        };
        let mut walker = PartsWalker {
            index,
            tracker,
            state_map: goal_only(goal_ref),
            visited: HashSet::new(),
            on_path: HashSet::new(),
            cycles: 0,
        };
        walker.on_path.insert(goal_id);
        Some(walker)
    }

    fn visit(&mut self, reference: &str) {
        // Dangling refs are skipped.
        let Some(id) = self.index.id_of(reference) else {
            return;
        };
        if self.on_path.contains(&id) {
            self.cycles += 1;
        }
        if !self.visited.insert(id) {
            return;
        }
        if self.state_map.contains_key(reference) {
            return;
        }
        let index = self.index;
        let Some(gloss) = index.by_id(id) else {
            return;
        };

        let practiced = self
            .tracker
            .map_or(false, |tracker| tracker.has_been_practiced(reference));
        let state = if practiced {
            LearningState::VocabToPractice
        } else if gloss.parts.is_empty() {
            LearningState::VocabToIntroduce
        } else {
            LearningState::VocabBlocked
        };
        self.state_map.insert(reference.to_string(), state);

        if gloss.parts.is_empty() {
            return;
        }
        self.on_path.insert(id);
        for part in &gloss.parts {
            self.visit(part);
        }
        self.on_path.remove(&id);
    }

    fn finish(self, goal_ref: &str) -> StateMap {
        if self.cycles > 0 {
            warn!(
                goal = goal_ref,
                cycles = self.cycles,
                "cycles detected in parts graph; affected glosses stay blocked"
            );
        }
        debug!(goal = goal_ref, glosses = self.state_map.len(), "resolved goal tree");
        self.state_map
    }
}

/// A part blocks while it is absent from the map, blocked, or not yet introduced.
/// A part missing from the corpus never enters the map, so it blocks for good.
pub fn has_blocking_parts(reference: &str, index: &GlossIndex, state_map: &StateMap) -> bool {
    let Some(gloss) = index.get(reference) else {
        return false;
    };
    gloss
        .parts
        .iter()
        .any(|part| match state_map.get(part.as_str()) {
            None => true,
            Some(state) => matches!(
                state,
                LearningState::VocabBlocked | LearningState::VocabToIntroduce
            ),
        })
}

pub fn can_unblock(reference: &str, index: &GlossIndex, state_map: &StateMap) -> bool {
    state_map.get(reference) == Some(&LearningState::VocabBlocked)
        && !has_blocking_parts(reference, index, state_map)
}
