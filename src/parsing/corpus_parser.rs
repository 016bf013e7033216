//*** START FILE: src/parsing/corpus_parser.rs ***//
use crate::error::{GlosswalkError, Result};
use crate::types::gloss::{Gloss, GlossRef, NormalizedGloss, UNDETERMINED_LANGUAGE};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Keeps the first occurrence of every ref, in order.
pub fn dedupe_refs(refs: Vec<GlossRef>) -> Vec<GlossRef> {
    let mut seen = HashSet::with_capacity(refs.len());
    refs.into_iter()
        .filter(|r| !r.is_empty() && seen.insert(r.clone()))
        .collect()
}

/// Validates a raw record and fills every optional field.
/// The only fatal case is a missing or empty `content`.
pub fn normalize_gloss(gloss: Gloss) -> Result<NormalizedGloss> {
    let content = match gloss.content {
        Some(content) if !content.is_empty() => content,
        _ => {
            return Err(GlosswalkError::MissingContent {
                reference: gloss.r#ref,
            })
        }
    };

    Ok(NormalizedGloss {
        r#ref: gloss.r#ref.filter(|r| !r.is_empty()),
        content,
        language: gloss
            .language
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNDETERMINED_LANGUAGE.to_string()),
        transcriptions: gloss.transcriptions.unwrap_or_default(),
        logs: gloss.logs.unwrap_or_default(),
        parts: dedupe_refs(gloss.parts),
        translations: dedupe_refs(gloss.translations),
        usage_examples: dedupe_refs(gloss.usage_examples),
        morphologically_related: dedupe_refs(gloss.morphologically_related),
        has_similar_meaning: dedupe_refs(gloss.has_similar_meaning),
        sounds_similar: dedupe_refs(gloss.sounds_similar),
        to_be_differentiated_from: dedupe_refs(gloss.to_be_differentiated_from),
        collocations: dedupe_refs(gloss.collocations),
        typical_follow_up: dedupe_refs(gloss.typical_follow_up),
        children: dedupe_refs(gloss.children),
        notes: dedupe_refs(gloss.notes),
        tags: dedupe_refs(gloss.tags),
    })
}

/// Parses newline-delimited JSON, one gloss per line. Blank lines are skipped;
/// any other line that fails to parse fails the whole load.
pub fn parse_corpus_jsonl(jsonl_content: &str) -> Result<Vec<Gloss>> {
    jsonl_content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Gloss>(line.trim()).map_err(|source| GlosswalkError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

pub fn parse_normalized_corpus(jsonl_content: &str) -> Result<Vec<NormalizedGloss>> {
    parse_corpus_jsonl(jsonl_content)?
        .into_iter()
        .map(normalize_gloss)
        .collect()
}

pub fn load_corpus_file(file_path: &Path) -> Result<Vec<NormalizedGloss>> {
    let contents =
        fs::read_to_string(file_path).map_err(|e| GlosswalkError::io(file_path, e))?;
    let glosses = parse_normalized_corpus(&contents)?;
    info!(path = %file_path.display(), count = glosses.len(), "loaded gloss corpus");
    Ok(glosses)
}

/// One-shot fetch; a non-success status is reported with the URL, never retried.
pub async fn fetch_corpus(url: &str) -> Result<Vec<NormalizedGloss>> {
    debug!(url, "fetching gloss corpus");
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(GlosswalkError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    let glosses = parse_normalized_corpus(&body)?;
    info!(url, count = glosses.len(), "fetched gloss corpus");
    Ok(glosses)
}

pub fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads from an `http(s)://` URL or a local `.jsonl` path.
pub async fn load_corpus(source: &str) -> Result<Vec<NormalizedGloss>> {
    if is_remote_source(source) {
        fetch_corpus(source).await
    } else {
        load_corpus_file(Path::new(source))
    }
}

//*** END FILE: src/parsing/corpus_parser.rs ***//
