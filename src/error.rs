use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlosswalkError {
    #[error("gloss {} is missing required content", reference.as_deref().unwrap_or("<anonymous>"))]
    MissingContent { reference: Option<String> },

    #[error("corpus line {line} is not a valid gloss record: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to fetch corpus from {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("corpus request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("practice snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("goal {0} is not in the corpus")]
    UnknownGoal(String),
}

pub type Result<T> = std::result::Result<T, GlosswalkError>;

impl GlosswalkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GlosswalkError::Io {
            path: path.into(),
            source,
        }
    }
}
