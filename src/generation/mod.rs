//! Grounded answer generation and citation handling

pub mod composer;
pub mod prompt;
pub mod sources;

pub use composer::AnswerComposer;
pub use prompt::{CitationGrammar, PromptBuilder};
pub use sources::{extract_sources, rewrite_with_keys};
