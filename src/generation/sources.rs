//! Source extraction: parse inline citations out of an answer
//!
//! A dedicated parser with an explicit grammar rather than ad hoc pattern
//! matching, so a citation either matches a grammar rule exactly or is not
//! a citation. Three independent scanning passes (web links, timestamp
//! markers, PDF page references) are combined by first-occurrence position;
//! keys are 1-based and deduplicated within one answer. The derived list is
//! recomputed on every render and never persisted.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{SourceCitation, SourceKind};

/// Markdown link: `[label](http(s)://…)`
fn web_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]\n]+)\]\((https?://[^)\s]+)\)").expect("static regex"))
}

/// Inline timestamp marker: `At MM:SS` or `At H:MM:SS`
fn youtube_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bAt (\d{1,2}:\d{2}(?::\d{2})?)").expect("static regex"))
}

/// PDF page reference: `[file.pdf, page N]`
fn pdf_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[([^\]\n,]+\.pdf),\s*[Pp]age\s+(\d+)\]").expect("static regex")
    })
}

/// One grammar match before deduplication
struct RawMatch {
    span: Range<usize>,
    kind: SourceKind,
    name: String,
    reference: String,
    /// Dedup identity: URL, timestamp string, or file+page
    dedup_key: String,
}

/// Extract the deduplicated, ordered source list from an answer
///
/// Keys are assigned in first-occurrence order across all passes;
/// re-encountering the same URL, timestamp, or page does not create a
/// duplicate entry.
pub fn extract_sources(answer: &str) -> Vec<SourceCitation> {
    let (citations, _) = scan(answer);
    citations
}

/// Rewrite cited spans into compact numeric references (`[1]`, `[2]`, …)
///
/// A pure text rewrite over the same grammar: every occurrence of a
/// citation is replaced by the bracketed key it deduplicated to.
pub fn rewrite_with_keys(answer: &str) -> (String, Vec<SourceCitation>) {
    let (citations, spans) = scan(answer);

    let mut rewritten = String::with_capacity(answer.len());
    let mut cursor = 0usize;
    for (span, key) in spans {
        rewritten.push_str(&answer[cursor..span.start]);
        rewritten.push_str(&format!("[{}]", key));
        cursor = span.end;
    }
    rewritten.push_str(&answer[cursor..]);

    (rewritten, citations)
}

/// Run all passes, resolve overlaps, dedup, and assign keys
fn scan(answer: &str) -> (Vec<SourceCitation>, Vec<(Range<usize>, u32)>) {
    let mut matches: Vec<RawMatch> = Vec::new();

    for cap in web_pattern().captures_iter(answer) {
        let whole = cap.get(0).expect("match");
        let url = cap[2].to_string();
        matches.push(RawMatch {
            span: whole.range(),
            kind: SourceKind::Web,
            name: cap[1].to_string(),
            dedup_key: url.clone(),
            reference: url,
        });
    }

    for cap in youtube_pattern().captures_iter(answer) {
        let whole = cap.get(0).expect("match");
        let timestamp = cap[1].to_string();
        matches.push(RawMatch {
            span: whole.range(),
            kind: SourceKind::Youtube,
            name: format!("At {}", timestamp),
            dedup_key: timestamp.clone(),
            reference: timestamp,
        });
    }

    for cap in pdf_pattern().captures_iter(answer) {
        let whole = cap.get(0).expect("match");
        let file = cap[1].trim().to_string();
        let page = cap[2].to_string();
        matches.push(RawMatch {
            span: whole.range(),
            kind: SourceKind::Pdf,
            dedup_key: format!("{}#{}", file, page),
            name: file,
            reference: format!("page {}", page),
        });
    }

    // First-occurrence order across the combined passes; on identical start
    // positions the longer span wins (a web link whose label happens to look
    // like a PDF reference is one citation, not two).
    matches.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let mut citations: Vec<SourceCitation> = Vec::new();
    let mut keys: HashMap<(SourceKind, String), u32> = HashMap::new();
    let mut spans: Vec<(Range<usize>, u32)> = Vec::new();
    let mut last_end = 0usize;

    for m in matches {
        // Skip matches nested inside an already-accepted span.
        if m.span.start < last_end {
            continue;
        }
        last_end = m.span.end;

        let key = *keys
            .entry((m.kind, m.dedup_key.clone()))
            .or_insert_with(|| {
                let key = citations.len() as u32 + 1;
                citations.push(SourceCitation {
                    kind: m.kind,
                    name: m.name.clone(),
                    reference: m.reference.clone(),
                    key,
                });
                key
            });

        spans.push((m.span, key));
    }

    (citations, spans)
}
