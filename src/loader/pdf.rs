//! PDF loader: one document per page

use crate::error::{Error, Result};
use crate::types::{Document, SourceMetadata};

/// Load a PDF from raw bytes, splitting by page
///
/// Every page becomes one document with `source_id = filename` and a
/// 1-based page number, so citations can point at the page and deletion by
/// filename removes the whole file.
pub fn load_pdf(filename: &str, data: &[u8]) -> Result<Vec<Document>> {
    if data.is_empty() {
        return Err(Error::UnreadablePdf("empty file".to_string()));
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| Error::UnreadablePdf(format!("{}: {}", filename, e)))?;

    // Cross-check the page count; a mismatch here usually means a partially
    // damaged xref table.
    if let Ok(doc) = lopdf::Document::load_mem(data) {
        let declared = doc.get_pages().len();
        if declared != pages.len() {
            tracing::warn!(
                filename,
                declared,
                extracted = pages.len(),
                "page count mismatch during PDF extraction"
            );
        }
    }

    let documents: Vec<Document> = pages
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = cleanup_page_text(&raw);
            if text.is_empty() {
                None
            } else {
                Some(Document::new(
                    text,
                    SourceMetadata::pdf(filename, (i + 1) as u32),
                ))
            }
        })
        .collect();

    if documents.is_empty() {
        return Err(Error::UnreadablePdf(format!(
            "{}: no text content could be extracted",
            filename
        )));
    }

    Ok(documents)
}

/// Strip null bytes and collapse blank lines left behind by extraction
fn cleanup_page_text(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
