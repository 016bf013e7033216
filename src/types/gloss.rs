//*** START FILE: src/types/gloss.rs ***//
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub type GlossRef = String;

/// Language code used when a record does not carry one.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// A gloss record exactly as it appears on a corpus line.
/// Relation fields accept anything; non-lists come through as empty.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Gloss {
    #[serde(default)]
    pub r#ref: Option<GlossRef>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub transcriptions: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub logs: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub parts: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub translations: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub usage_examples: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub morphologically_related: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub has_similar_meaning: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub sounds_similar: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub to_be_differentiated_from: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub collocations: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub typical_follow_up: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub children: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub notes: Vec<GlossRef>,
    #[serde(default, deserialize_with = "lenient_refs")]
    pub tags: Vec<GlossRef>,
}

// Only arrays contribute refs, and only their non-empty string members.
fn lenient_refs<'de, D>(deserializer: D) -> Result<Vec<GlossRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// A validated gloss. Every relation list is present and free of duplicates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedGloss {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#ref: Option<GlossRef>,
    pub content: String,
    pub language: String,
    pub transcriptions: BTreeMap<String, String>,
    pub logs: BTreeMap<String, String>,
    pub parts: Vec<GlossRef>,
    pub translations: Vec<GlossRef>,
    pub usage_examples: Vec<GlossRef>,
    pub morphologically_related: Vec<GlossRef>,
    pub has_similar_meaning: Vec<GlossRef>,
    pub sounds_similar: Vec<GlossRef>,
    pub to_be_differentiated_from: Vec<GlossRef>,
    pub collocations: Vec<GlossRef>,
    pub typical_follow_up: Vec<GlossRef>,
    pub children: Vec<GlossRef>,
    pub notes: Vec<GlossRef>,
    pub tags: Vec<GlossRef>,
}

impl NormalizedGloss {
    pub fn ref_str(&self) -> Option<&str> {
        self.r#ref.as_deref()
    }

    /// Structural groupings are written as `-name-` and are not vocabulary.
    pub fn is_collection(&self) -> bool {
        is_collection_content(&self.content)
    }
}

pub fn is_collection_content(content: &str) -> bool {
    content.starts_with('-') && content.ends_with('-')
}

/// Four-phase lifecycle of a gloss inside one session, plus the goal marker.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum LearningState {
    VocabBlocked,
    VocabToIntroduce,
    VocabToPractice,
    FinalChallenge,
    Done,
}

impl LearningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningState::VocabBlocked => "VOCAB-BLOCKED",
            LearningState::VocabToIntroduce => "VOCAB-TO-INTRODUCE",
            LearningState::VocabToPractice => "VOCAB-TO-PRACTICE",
            LearningState::FinalChallenge => "FINAL-CHALLENGE",
            LearningState::Done => "DONE",
        }
    }

    /// Due items are the ones the practice loop may pick.
    pub fn is_due(&self) -> bool {
        matches!(self, LearningState::VocabToIntroduce | LearningState::VocabToPractice)
    }

    /// A part in one of these states no longer gates the gloss built from it.
    pub fn satisfies_prerequisite(&self) -> bool {
        matches!(self, LearningState::VocabToPractice | LearningState::Done)
    }
}

impl fmt::Display for LearningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskType {
    MemorizeFromNative,
    MemorizeFromTarget,
    RecallFromNative,
    RecallFromTarget,
    FormSentence,
    UnderstandNativeFromSentence,
    UnderstandTargetFromSentence,
    UnderstandSentenceAroundTargetGloss,
    ChallengeTryToExpress,
    ChallengeTryToUnderstand,
}

impl TaskType {
    pub const ALL: [TaskType; 10] = [
        TaskType::MemorizeFromNative,
        TaskType::MemorizeFromTarget,
        TaskType::RecallFromNative,
        TaskType::RecallFromTarget,
        TaskType::FormSentence,
        TaskType::UnderstandNativeFromSentence,
        TaskType::UnderstandTargetFromSentence,
        TaskType::UnderstandSentenceAroundTargetGloss,
        TaskType::ChallengeTryToExpress,
        TaskType::ChallengeTryToUnderstand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::MemorizeFromNative => "MemorizeFromNative",
            TaskType::MemorizeFromTarget => "MemorizeFromTarget",
            TaskType::RecallFromNative => "RecallFromNative",
            TaskType::RecallFromTarget => "RecallFromTarget",
            TaskType::FormSentence => "FormSentence",
            TaskType::UnderstandNativeFromSentence => "UnderstandNativeFromSentence",
            TaskType::UnderstandTargetFromSentence => "UnderstandTargetFromSentence",
            TaskType::UnderstandSentenceAroundTargetGloss => "UnderstandSentenceAroundTargetGloss",
            TaskType::ChallengeTryToExpress => "ChallengeTryToExpress",
            TaskType::ChallengeTryToUnderstand => "ChallengeTryToUnderstand",
        }
    }

    /// Exposure alone moves VOCAB-TO-INTRODUCE to VOCAB-TO-PRACTICE.
    pub fn is_introduction(&self) -> bool {
        matches!(
            self,
            TaskType::MemorizeFromNative
                | TaskType::MemorizeFromTarget
                | TaskType::UnderstandNativeFromSentence
                | TaskType::UnderstandTargetFromSentence
        )
    }

    /// A correct recall moves VOCAB-TO-PRACTICE to DONE.
    pub fn is_completion(&self) -> bool {
        matches!(self, TaskType::RecallFromNative | TaskType::RecallFromTarget)
    }

    /// Tasks where the learner grades their own recall.
    pub fn is_self_assessment(&self) -> bool {
        matches!(
            self,
            TaskType::RecallFromNative
                | TaskType::RecallFromTarget
                | TaskType::UnderstandNativeFromSentence
                | TaskType::UnderstandTargetFromSentence
                | TaskType::UnderstandSentenceAroundTargetGloss
        )
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Procedural` produces the goal expression, `Understand` comprehends it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    Procedural,
    Understand,
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PracticeMode::Procedural => f.write_str("procedural"),
            PracticeMode::Understand => f.write_str("understand"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TaskContext {
    pub native_iso: String,
    pub target_iso: String,
}

impl TaskContext {
    pub fn new(native_iso: impl Into<String>, target_iso: impl Into<String>) -> Self {
        TaskContext {
            native_iso: native_iso.into(),
            target_iso: target_iso.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PracticeGoal {
    pub final_challenge: GlossRef,
    // Kept for corpus compatibility; resolution walks `parts` from the final challenge.
    #[serde(default)]
    pub need_to_be_learned: Vec<GlossRef>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SituationGoals {
    #[serde(rename = "procedural-paraphrase-expression-goals", default)]
    pub procedural: Vec<PracticeGoal>,
    #[serde(rename = "understand-expression-goals", default)]
    pub understand: Vec<PracticeGoal>,
}

impl SituationGoals {
    pub fn for_mode(&self, mode: PracticeMode) -> &[PracticeGoal] {
        match mode {
            PracticeMode::Procedural => &self.procedural,
            PracticeMode::Understand => &self.understand,
        }
    }

    pub fn available_modes(&self) -> Vec<PracticeMode> {
        [PracticeMode::Procedural, PracticeMode::Understand]
            .into_iter()
            .filter(|mode| !self.for_mode(*mode).is_empty())
            .collect()
    }
}

//*** END FILE: src/types/gloss.rs ***//
