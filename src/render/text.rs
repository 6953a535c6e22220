//! Plain text rendering for TEI documents.

use crate::model::Document;

use super::RenderOptions;

/// Convert a document to plain text.
///
/// Headings and fragment text are separated by blank lines; no markup is
/// emitted.
pub fn to_text(doc: &Document, options: &RenderOptions) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(ref title) = doc.title {
        blocks.push(title.clone());
    }

    if options.include_abstract {
        blocks.extend(doc.abstract_fragments.iter().map(|f| f.plain_text()));
    }

    for section in &doc.sections {
        if let Some(ref heading) = section.heading {
            blocks.push(heading.clone());
        }
        blocks.extend(section.fragments.iter().map(|f| f.plain_text()));
    }

    if options.include_annex {
        blocks.extend(doc.annex.iter().map(|f| f.plain_text()));
    }

    blocks.retain(|b| !b.trim().is_empty());
    blocks.join("\n\n")
}
