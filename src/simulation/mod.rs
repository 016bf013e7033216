pub mod dictionary;
pub mod practice_state;
pub mod resolver;
pub mod session;

pub use dictionary::{GlossId, GlossIndex};
pub use practice_state::{DueGloss, PracticeState};
pub use resolver::{
    can_unblock, has_blocking_parts, resolver_for, GoalResolver, ProceduralResolver, StateMap,
    UnderstandResolver,
};
pub use session::{
    choose_goal, simulate_goal, CallbackOutcomes, OutcomeSource, SessionDriver, SessionReport,
    SessionStep, SimulatedOutcomes, DEFAULT_MAX_ITERATIONS,
};
