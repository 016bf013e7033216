//*** START FILE: src/lib.rs ***//

pub mod config;
pub mod error;
pub mod types {
    pub mod gloss;
}
pub mod parsing;
pub mod simulation;
pub mod tasks;
pub mod modes;
pub mod lesson;
pub mod profile;
pub mod profile_io;

pub use error::{GlosswalkError, Result};
pub use simulation::dictionary::GlossIndex;
pub use types::gloss::{LearningState, NormalizedGloss, PracticeMode, TaskContext, TaskType};

//*** END FILE: src/lib.rs ***//
