//! Answer composition: prompt, model call, normalization

use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::providers::{LlmProvider, ScoredEntry};

use super::prompt::{CitationGrammar, PromptBuilder};

/// Composes a grounded answer from retrieved chunks
///
/// One model call per request; failures surface as `Error::Generation`
/// with no automatic retry. With zero retrieved chunks the composer still
/// runs against an explicitly empty context, so the model answers that it
/// does not know rather than fabricating.
pub struct AnswerComposer {
    llm: Arc<dyn LlmProvider>,
    prompt: PromptBuilder,
    single_asterisk: Regex,
}

impl AnswerComposer {
    /// Create a composer over the given model
    pub fn new(llm: Arc<dyn LlmProvider>, grammar: CitationGrammar) -> Self {
        Self {
            llm,
            prompt: PromptBuilder::new(grammar),
            // Single-asterisk emphasis spans; double asterisks are left alone.
            single_asterisk: Regex::new(r"(?P<pre>^|[^*])\*(?P<body>[^*\n]+)\*(?P<post>$|[^*])")
                .expect("static regex"),
        }
    }

    /// Compose an answer for a query from its retrieved chunks
    pub async fn compose(&self, query: &str, retrieved: &[ScoredEntry]) -> Result<String> {
        let system = self.prompt.build_system_prompt(retrieved);

        tracing::debug!(
            model = self.llm.model(),
            chunks = retrieved.len(),
            "composing answer"
        );

        let raw = self.llm.complete(&system, query).await?;
        Ok(self.normalize_markdown(&raw))
    }

    /// Apply the output contract's normalization rules to model output
    ///
    /// The prompt already mandates these, but models drift: single-asterisk
    /// emphasis becomes double-asterisk bold, and literal `\n` markers
    /// become real line breaks.
    pub fn normalize_markdown(&self, text: &str) -> String {
        let text = text.replace("\\n", "\n");

        self.single_asterisk
            .replace_all(&text, "$pre**$body**$post")
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            Ok(user.to_string())
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }
    }

    fn composer() -> AnswerComposer {
        AnswerComposer::new(Arc::new(EchoLlm), CitationGrammar::default())
    }

    #[test]
    fn single_asterisk_emphasis_becomes_bold() {
        let normalized = composer().normalize_markdown("This is *important* text.");
        assert_eq!(normalized, "This is **important** text.");
    }

    #[test]
    fn double_asterisk_bold_is_untouched() {
        let normalized = composer().normalize_markdown("Already **bold** here.");
        assert_eq!(normalized, "Already **bold** here.");
    }

    #[test]
    fn literal_newline_markers_become_line_breaks() {
        let normalized = composer().normalize_markdown("line one\\nline two");
        assert_eq!(normalized, "line one\nline two");
    }

    #[tokio::test]
    async fn compose_passes_query_through_to_model() {
        let answer = composer().compose("What color is the sky?", &[]).await.unwrap();
        assert_eq!(answer, "What color is the sky?");
    }
}
