//! Paragraph and inline reference types.

use serde::{Deserialize, Serialize};

/// A paragraph of running text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Trimmed paragraph text, citation markers included verbatim
    pub text: String,

    /// Inline references found in the text, in order
    pub refs: Vec<InlineRef>,
}

impl Paragraph {
    /// Create a paragraph with plain text and no references.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            refs: Vec::new(),
        }
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Get the text covered by a reference.
    ///
    /// Offsets count characters, not bytes.
    pub fn ref_text(&self, r: &InlineRef) -> Option<String> {
        if r.offset_end > self.text.chars().count() {
            return None;
        }
        Some(
            self.text
                .chars()
                .skip(r.offset_start)
                .take(r.offset_end - r.offset_start)
                .collect(),
        )
    }
}

/// An inline reference (citation marker, figure or formula callout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRef {
    /// Reference kind from the TEI `type` attribute (e.g. "bibr", "figure")
    pub kind: Option<String>,

    /// Target identifier (e.g. "#b1")
    pub target: Option<String>,

    /// Visible text of the marker, trimmed
    pub text: String,

    /// Start offset in the paragraph text (characters, inclusive)
    pub offset_start: usize,

    /// End offset in the paragraph text (characters, exclusive)
    pub offset_end: usize,
}

impl InlineRef {
    /// Length of the marker in characters.
    pub fn len(&self) -> usize {
        self.offset_end - self.offset_start
    }

    /// Markers are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.offset_end <= self.offset_start
    }
}
