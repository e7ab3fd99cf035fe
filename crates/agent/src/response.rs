//! Response assembly for the search agent.
//!
//! Layout, in fixed order: synthesis, one entry per source, flat URL list.

use sourcer_core::document::Document;
use sourcer_rag::ScoredChunk;

const MAX_SOURCE_CHARS: usize = 800;

/// One cited source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub title: String,
    pub url: String,
    /// Whitespace-collapsed excerpt of at most 800 characters.
    pub excerpt: String,
}

impl SourceEntry {
    pub fn render(&self) -> String {
        format!(
            "**Title:** {}\n**URL:** {}\n**Content:**\n{}...\n{}",
            self.title,
            self.url,
            self.excerpt,
            "-".repeat(50)
        )
    }
}

/// One entry per fetched document, in rank order. Failed fetches are left out.
///
/// The excerpt is built from the chunks retrieved for that document when
/// there are any, otherwise from the start of the document.
pub fn source_entries(documents: &[Document], retrieved: &[ScoredChunk]) -> Vec<SourceEntry> {
    documents
        .iter()
        .filter(|doc| !doc.is_error)
        .map(|doc| {
            let mut chunks: Vec<&ScoredChunk> = retrieved
                .iter()
                .filter(|scored| &*scored.chunk.source == doc.source.as_str())
                .collect();
            chunks.sort_by_key(|scored| scored.chunk.chunk_index);

            let text = if chunks.is_empty() {
                doc.content.clone()
            } else {
                chunks
                    .iter()
                    .map(|scored| scored.chunk.content.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            };

            SourceEntry {
                title: doc.display_title().to_string(),
                url: doc.source.clone(),
                excerpt: excerpt(&text),
            }
        })
        .collect()
}

/// The final response text.
pub fn assemble(synthesis: &str, sources: &[SourceEntry]) -> String {
    let rendered: Vec<String> = sources.iter().map(SourceEntry::render).collect();
    let urls: Vec<String> = sources.iter().map(|s| format!("- {}", s.url)).collect();
    format!(
        "## Synthesis\n\n{synthesis}\n\n## Sources\n\n{}\n\n### URLs:\n{}",
        rendered.join("\n\n"),
        urls.join("\n")
    )
}

fn excerpt(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_SOURCE_CHARS)
        .collect()
}
