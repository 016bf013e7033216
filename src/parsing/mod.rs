//*** START FILE: src/parsing/mod.rs ***//
pub mod corpus_parser;

// Re-export the loaders for convenience
pub use corpus_parser::{load_corpus, load_corpus_file, normalize_gloss, parse_normalized_corpus};
//*** END FILE: src/parsing/mod.rs ***//
