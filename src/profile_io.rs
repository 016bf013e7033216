//*** START FILE: src/profile_io.rs ***//
use crate::error::{GlosswalkError, Result};
use crate::profile::PracticeStore;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind as IoErrorKind};
use std::path::Path;
use tracing::debug;

// `version` is written as SNAPSHOT_VERSION; loading does not check it yet.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PracticeSnapshot {
    pub version: u32,
    pub practice: PracticeStore,
}

const SNAPSHOT_VERSION: u32 = 1;

/// Saves the practice store to a JSON file.
pub fn save_practice_snapshot(store: &PracticeStore, file_path: &Path) -> Result<()> {
    let snapshot = PracticeSnapshot {
        version: SNAPSHOT_VERSION,
        practice: store.clone(),
    };

    let file = File::create(file_path).map_err(|e| GlosswalkError::io(file_path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &snapshot)?;

    debug!(path = %file_path.display(), records = store.len(), "saved practice snapshot");
    Ok(())
}

/// Loads the practice store from a JSON file.
pub fn load_practice_snapshot(file_path: &Path) -> Result<PracticeStore> {
    let file = File::open(file_path).map_err(|e| GlosswalkError::io(file_path, e))?;
    let reader = BufReader::new(file);
    let snapshot: PracticeSnapshot = serde_json::from_reader(reader)?;
    Ok(snapshot.practice)
}

/// Like `load_practice_snapshot`, but a missing file is a fresh learner.
pub fn load_practice_snapshot_or_default(file_path: &Path) -> Result<PracticeStore> {
    match load_practice_snapshot(file_path) {
        Err(GlosswalkError::Io { source, .. }) if source.kind() == IoErrorKind::NotFound => {
            debug!(path = %file_path.display(), "no practice snapshot yet, starting empty");
            Ok(PracticeStore::new())
        }
        other => other,
    }
}

//*** END FILE: src/profile_io.rs ***//
