//! Document-level types.

use super::{Citation, ContentFragment};
use serde::{Deserialize, Serialize};

/// A converted TEI document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Main title
    pub title: Option<String>,

    /// Header authors (bibliography authors never appear here)
    pub authors: Vec<Author>,

    /// Header affiliations, in document order
    pub affiliations: Vec<String>,

    /// Publication date
    pub publication_date: Option<PublicationDate>,

    /// DOI from the header
    pub doi: Option<String>,

    /// Publisher from the header
    pub publisher: Option<String>,

    /// Abstract content
    pub abstract_fragments: Vec<ContentFragment>,

    /// Body sections, flattened, in document order
    pub sections: Vec<Section>,

    /// Back-matter content (bibliography excluded), without headings
    pub annex: Vec<ContentFragment>,

    /// Bibliography entries ordered by ordinal
    pub bibliography: Vec<Citation>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the document carries no content at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_empty()
            && self.affiliations.is_empty()
            && self.publication_date.is_none()
            && self.abstract_fragments.is_empty()
            && self.sections.is_empty()
            && self.annex.is_empty()
            && self.bibliography.is_empty()
    }

    /// Iterate over all body fragments with their section heading.
    pub fn body_fragments(&self) -> impl Iterator<Item = (Option<&str>, &ContentFragment)> {
        self.sections.iter().flat_map(|section| {
            section
                .fragments
                .iter()
                .map(move |f| (section.heading.as_deref(), f))
        })
    }

    /// Get a citation by ordinal.
    pub fn citation(&self, ordinal: u32) -> Option<&Citation> {
        self.bibliography.iter().find(|c| c.ordinal == ordinal)
    }

    /// Compute content statistics.
    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            section_count: self.sections.len() as u32,
            citation_count: self.bibliography.len() as u32,
            ..Default::default()
        };

        let fragments = self
            .abstract_fragments
            .iter()
            .chain(self.sections.iter().flat_map(|s| &s.fragments))
            .chain(&self.annex);

        for fragment in fragments {
            match fragment {
                ContentFragment::Paragraph(p) => {
                    stats.paragraph_count += 1;
                    stats.word_count += p.text.split_whitespace().count() as u32;
                }
                ContentFragment::Figure(_) => stats.figure_count += 1,
                ContentFragment::Table(_) => stats.table_count += 1,
                ContentFragment::Formula(_) => stats.formula_count += 1,
            }
        }
        stats
    }

    /// Convert header metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(ref title) = self.title {
            lines.push(format!("title: \"{}\"", escape_yaml(title)));
        }
        if !self.authors.is_empty() {
            lines.push("authors:".to_string());
            for author in &self.authors {
                lines.push(format!("  - \"{}\"", escape_yaml(&author.name)));
            }
        }
        if let Some(ref date) = self.publication_date {
            lines.push(format!("date: \"{}\"", escape_yaml(&date.raw)));
        }
        if let Some(ref doi) = self.doi {
            lines.push(format!("doi: \"{}\"", escape_yaml(doi)));
        }
        if let Some(ref publisher) = self.publisher {
            lines.push(format!("publisher: \"{}\"", escape_yaml(publisher)));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// A document author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Assembled full name, never empty
    pub name: String,
}

impl Author {
    /// Assemble a name from optional forename and surname parts.
    ///
    /// Returns `None` when neither part has text.
    pub fn from_parts(forename: Option<&str>, surname: Option<&str>) -> Option<Self> {
        let forename = forename.map(str::trim).filter(|s| !s.is_empty());
        let surname = surname.map(str::trim).filter(|s| !s.is_empty());

        let name = match (forename, surname) {
            (Some(f), Some(s)) => format!("{} {}", f, s),
            (None, Some(s)) => s.to_string(),
            (Some(f), None) => f.to_string(),
            (None, None) => return None,
        };
        Some(Self { name })
    }
}

/// A publication date in machine-readable and display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    /// Value of the `when` attribute as written (e.g. "2016-03-08")
    pub raw: String,

    /// Long-form display text (e.g. "March 08, 2016"), or `raw` if the value
    /// could not be normalized
    pub formatted: String,
}

/// A body section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading
    pub heading: Option<String>,

    /// Content in document order
    pub fragments: Vec<ContentFragment>,
}

impl Section {
    /// Create a section.
    pub fn new(heading: Option<String>) -> Self {
        Self {
            heading,
            fragments: Vec::new(),
        }
    }

    /// Check if the section has neither heading nor content.
    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.fragments.is_empty()
    }
}

/// Content statistics for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of body sections
    pub section_count: u32,

    /// Number of paragraphs (abstract, body and annex)
    pub paragraph_count: u32,

    /// Number of formulas
    pub formula_count: u32,

    /// Number of figures
    pub figure_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of bibliography entries
    pub citation_count: u32,

    /// Approximate word count of paragraph text
    pub word_count: u32,
}
