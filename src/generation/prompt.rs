//! Prompt construction for grounded answers

use crate::providers::ScoredEntry;
use crate::types::SourceType;

/// The inline citation grammar the model is instructed to emit
///
/// One canonical form per source type, kept configurable because the
/// instruction wording is an output contract shared with the source
/// extraction parser: whatever is mandated here must be parseable there.
#[derive(Debug, Clone)]
pub struct CitationGrammar {
    /// PDF citation instruction, e.g. `[report.pdf, page 3]`
    pub pdf: String,
    /// Web citation instruction, e.g. `[Site Name](https://example.com)`
    pub web: String,
    /// YouTube citation instruction, e.g. `At 12:34`
    pub youtube: String,
}

impl Default for CitationGrammar {
    fn default() -> Self {
        Self {
            pdf: "cite the file and page in square brackets, exactly like [report.pdf, page 3]"
                .to_string(),
            web: "cite the page as a markdown link with the site name as the label, exactly like \
                  [Example Site](https://example.com/article)"
                .to_string(),
            youtube: "cite the moment with an inline timestamp marker, exactly like At 12:34 \
                      (or At 1:02:03 past one hour)"
                .to_string(),
        }
    }
}

/// Builder for the grounding system instruction
pub struct PromptBuilder {
    grammar: CitationGrammar,
}

impl PromptBuilder {
    /// Create a builder with the canonical citation grammar
    pub fn new(grammar: CitationGrammar) -> Self {
        Self { grammar }
    }

    /// Serialize retrieved chunks verbatim into a numbered context block
    ///
    /// No summarization and no filtering; the model sees exactly what the
    /// index returned, text and metadata both.
    pub fn build_context(&self, retrieved: &[ScoredEntry]) -> String {
        if retrieved.is_empty() {
            return "(no content has been ingested that matches this question)".to_string();
        }

        let mut context = String::new();
        for (i, entry) in retrieved.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n{}\n\n---\n\n",
                i + 1,
                entry.metadata.describe(),
                entry.text
            ));
        }
        context
    }

    /// Build the system instruction for one query
    pub fn build_system_prompt(&self, retrieved: &[ScoredEntry]) -> String {
        let context = self.build_context(retrieved);
        let kinds = source_kinds_present(retrieved);

        let mut citation_rules = String::new();
        if kinds.contains(&SourceType::Pdf) {
            citation_rules.push_str(&format!("- For PDF content, {}.\n", self.grammar.pdf));
        }
        if kinds.contains(&SourceType::Web) {
            citation_rules.push_str(&format!("- For web content, {}.\n", self.grammar.web));
        }
        if kinds.contains(&SourceType::Youtube) {
            citation_rules.push_str(&format!("- For video transcripts, {}.\n", self.grammar.youtube));
        }
        if citation_rules.is_empty() {
            citation_rules.push_str("- No external sources are present; do not invent citations.\n");
        }

        format!(
            r#"You are a note assistant that answers questions using ONLY the provided context.

GROUNDING RULES:
1. Use only information explicitly present in the CONTEXT below.
2. Never use outside knowledge, and never make anything up.
3. If the answer is not in the context, say you don't know instead of guessing.

CITATION RULES:
{citation_rules}
FORMATTING RULES:
- Respond in valid Markdown.
- Use double asterisks for emphasis (**bold**); never single-asterisk emphasis.
- Use real line breaks, never a literal "\n" marker.

CONTEXT:
{context}"#,
            citation_rules = citation_rules,
            context = context,
        )
    }
}

/// Source types present among the retrieved chunks
fn source_kinds_present(retrieved: &[ScoredEntry]) -> Vec<SourceType> {
    let mut kinds = Vec::new();
    for entry in retrieved {
        if !kinds.contains(&entry.metadata.source_type) {
            kinds.push(entry.metadata.source_type);
        }
    }
    kinds
}
