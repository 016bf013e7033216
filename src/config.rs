use crate::error::{GlosswalkError, Result};
use crate::lesson::DEFAULT_LESSON_SIZE;
use crate::parsing::corpus_parser::is_remote_source;
use crate::simulation::session::DEFAULT_MAX_ITERATIONS;
use crate::types::gloss::{SituationGoals, TaskContext};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "glosswalk.toml";

fn default_practice_store() -> String {
    "practice.json".to_string()
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_lesson_size() -> usize {
    DEFAULT_LESSON_SIZE
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Local `.jsonl` path or `http(s)://` URL.
    pub corpus: String,
    #[serde(default)]
    pub goals: Option<String>,
    pub native_iso: String,
    pub target_iso: String,
    #[serde(default = "default_practice_store")]
    pub practice_store: String,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_lesson_size")]
    pub lesson_size: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn task_context(&self) -> TaskContext {
        TaskContext::new(self.native_iso.clone(), self.target_iso.clone())
    }

    pub fn practice_store_path(&self) -> PathBuf {
        PathBuf::from(&self.practice_store)
    }

    fn validate(&self, file_path: &str) -> Result<()> {
        if !is_remote_source(&self.corpus) && !Path::new(&self.corpus).is_file() {
            return Err(GlosswalkError::Config(format!(
                "corpus specified in {} ('{}') is not a readable file",
                file_path, self.corpus
            )));
        }
        if self.native_iso == self.target_iso {
            return Err(GlosswalkError::Config(format!(
                "native_iso and target_iso in {} are both '{}'",
                file_path, self.native_iso
            )));
        }
        if self.max_iterations == 0 {
            return Err(GlosswalkError::Config(format!(
                "max_iterations in {} must be greater than zero",
                file_path
            )));
        }
        if self.lesson_size == 0 {
            return Err(GlosswalkError::Config(format!(
                "lesson_size in {} must be greater than zero",
                file_path
            )));
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str, file_path: &str) -> Result<Config> {
    let loaded_config: Config = toml::from_str(contents)?;
    loaded_config.validate(file_path)?;
    Ok(loaded_config)
}

pub fn load_config_from_file(file_path: &str) -> Result<Config> {
    let contents = fs::read_to_string(file_path).map_err(|e| GlosswalkError::io(file_path, e))?;
    let config = parse_config(&contents, file_path)?;
    info!(path = file_path, corpus = %config.corpus, "configuration loaded");
    Ok(config)
}

/// Situation goals from the configured JSON file; no file means no goals.
pub fn load_goals(config: &Config) -> Result<SituationGoals> {
    let Some(goals_path) = &config.goals else {
        return Ok(SituationGoals::default());
    };
    let contents = fs::read_to_string(goals_path).map_err(|e| GlosswalkError::io(goals_path, e))?;
    serde_json::from_str(&contents).map_err(|e| {
        GlosswalkError::Config(format!("goals file '{}' is not valid: {}", goals_path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"ref":"a","content":"a"}}"#).unwrap();
        file
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let corpus = corpus_file();
        let toml = format!(
            "corpus = {:?}\nnative_iso = \"eng\"\ntarget_iso = \"spa\"\n",
            corpus.path().display().to_string()
        );
        let config = parse_config(&toml, "test.toml").unwrap();
        assert_eq!(config.practice_store, "practice.json");
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.lesson_size, 16);
        assert!(config.goals.is_none());
        assert!(config.seed.is_none());
        assert_eq!(config.task_context(), TaskContext::new("eng", "spa"));
    }

    #[test]
    fn remote_corpus_is_not_checked_on_disk() {
        let toml = "corpus = \"https://example.org/glosses.jsonl\"\nnative_iso = \"eng\"\ntarget_iso = \"spa\"\nseed = 7\n";
        let config = parse_config(toml, "test.toml").unwrap();
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let corpus = corpus_file();
        let path = corpus.path().display().to_string();
        let same_language = format!("corpus = {path:?}\nnative_iso = \"eng\"\ntarget_iso = \"eng\"\n");
        assert!(matches!(parse_config(&same_language, "t"), Err(GlosswalkError::Config(_))));

        let zero_cap = format!(
            "corpus = {path:?}\nnative_iso = \"eng\"\ntarget_iso = \"spa\"\nmax_iterations = 0\n"
        );
        assert!(matches!(parse_config(&zero_cap, "t"), Err(GlosswalkError::Config(_))));

        let missing = "corpus = \"/no/such/corpus.jsonl\"\nnative_iso = \"eng\"\ntarget_iso = \"spa\"\n";
        assert!(matches!(parse_config(missing, "t"), Err(GlosswalkError::Config(_))));

        assert!(matches!(parse_config("corpus = 3", "t"), Err(GlosswalkError::ConfigParse(_))));
    }

    #[test]
    fn goals_file_is_optional() {
        let corpus = corpus_file();
        let mut goals = tempfile::NamedTempFile::new().unwrap();
        write!(
            goals,
            r#"{{"understand-expression-goals":[{{"finalChallenge":"a","needToBeLearned":["b"]}}]}}"#
        )
        .unwrap();

        let mut config = parse_config(
            &format!(
                "corpus = {:?}\nnative_iso = \"eng\"\ntarget_iso = \"spa\"\n",
                corpus.path().display().to_string()
            ),
            "t",
        )
        .unwrap();
        assert!(load_goals(&config).unwrap().available_modes().is_empty());

        config.goals = Some(goals.path().display().to_string());
        let loaded = load_goals(&config).unwrap();
        assert_eq!(loaded.understand.len(), 1);
        assert_eq!(loaded.understand[0].final_challenge, "a");
        assert!(loaded.procedural.is_empty());
    }
}
