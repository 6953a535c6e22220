//! # untei
//!
//! TEI XML conversion library for Rust.
//!
//! This library reads TEI documents as produced by scholarly document
//! pipelines such as GROBID and converts them to Markdown, plain text and a
//! structured JSON record.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untei::{parse_file, render};
//!
//! fn main() -> untei::Result<()> {
//!     // Parse a TEI file
//!     let doc = parse_file("paper.tei.xml")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options);
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Header metadata**: title, authors, affiliations, publication date, DOI
//! - **Ordered body content**: paragraphs, formulas, figures and tables in
//!   document order, with citation markers and their offsets
//! - **Bibliography**: numbered references with authors, venue and date
//! - **Multiple output formats**: Markdown, plain text, JSON record

pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod tree;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    Author, Citation, ContentFragment, Coordinate, Document, DocumentStats, Figure, Formula,
    InlineRef, Paragraph, PublicationDate, Section, Table,
};
pub use parser::{ErrorMode, ExtractMode, ParseOptions, TeiParser};
pub use render::{JsonFormat, Record, RenderOptions};

use std::io::Read;
use std::path::Path;

/// Parse a TEI file and return a structured document.
///
/// # Arguments
///
/// * `path` - Path to the TEI file
///
/// # Returns
///
/// A `Result` containing the parsed `Document` or an error.
///
/// # Example
///
/// ```no_run
/// use untei::parse_file;
///
/// let doc = parse_file("paper.tei.xml").unwrap();
/// println!("Sections: {}", doc.sections.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = TeiParser::open(path)?;
    parser.parse()
}

/// Parse a TEI file with custom options.
///
/// # Example
///
/// ```no_run
/// use untei::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .lenient()
///     .header_only();
/// let doc = parse_file_with_options("paper.tei.xml", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = TeiParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse TEI from bytes.
///
/// # Example
///
/// ```no_run
/// use untei::parse_bytes;
///
/// let data = std::fs::read("paper.tei.xml").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = TeiParser::from_bytes(data)?;
    parser.parse()
}

/// Parse TEI from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = TeiParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse TEI from a string.
pub fn parse_str(text: &str) -> Result<Document> {
    let parser = TeiParser::from_str(text)?;
    parser.parse()
}

/// Parse TEI from a string with custom options.
pub fn parse_str_with_options(text: &str, options: ParseOptions) -> Result<Document> {
    let parser = TeiParser::from_str_with_options(text, options)?;
    parser.parse()
}

/// Parse TEI from a reader.
///
/// # Example
///
/// ```no_run
/// use untei::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("paper.tei.xml").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = TeiParser::from_reader(reader)?;
    parser.parse()
}

/// Parse TEI from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = TeiParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Parse a TEI file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P) -> Result<Document> {
    let data = tokio::fs::read(path.as_ref()).await?;
    parse_bytes(&data)
}

/// Convert a TEI file to Markdown.
///
/// Returns `None` when the file cannot be read or is not a TEI document;
/// the failure is logged as a warning.
///
/// # Example
///
/// ```no_run
/// if let Some(markdown) = untei::tei_to_markdown("paper.tei.xml") {
///     std::fs::write("paper.md", markdown).unwrap();
/// }
/// ```
pub fn tei_to_markdown<P: AsRef<Path>>(path: P) -> Option<String> {
    let doc = loaded(parse_file(path.as_ref()), path.as_ref())?;
    Some(render::to_markdown(&doc, &RenderOptions::default()))
}

/// Convert TEI bytes to Markdown, or `None` if they cannot be loaded.
pub fn tei_bytes_to_markdown(data: &[u8]) -> Option<String> {
    let doc = loaded(parse_bytes(data), Path::new("<bytes>"))?;
    Some(render::to_markdown(&doc, &RenderOptions::default()))
}

/// Convert a TEI file to its structured record.
///
/// Returns `None` when the file cannot be read or is not a TEI document.
pub fn tei_to_record<P: AsRef<Path>>(path: P) -> Option<Record> {
    let doc = loaded(parse_file(path.as_ref()), path.as_ref())?;
    Some(render::to_record(&doc))
}

/// Convert TEI bytes to a structured record, or `None` if they cannot be
/// loaded.
pub fn tei_bytes_to_record(data: &[u8]) -> Option<Record> {
    let doc = loaded(parse_bytes(data), Path::new("<bytes>"))?;
    Some(render::to_record(&doc))
}

fn loaded(result: Result<Document>, source: &Path) -> Option<Document> {
    match result {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!(
                "The TEI input {} is not well-formed or empty, skipping: {}",
                source.display(),
                e
            );
            None
        }
    }
}

/// Builder for parsing and converting TEI documents.
///
/// # Example
///
/// ```no_run
/// use untei::Untei;
///
/// let markdown = Untei::new()
///     .with_frontmatter()
///     .with_abstract()
///     .lenient()
///     .parse("paper.tei.xml")?
///     .to_markdown();
/// # Ok::<(), untei::Error>(())
/// ```
pub struct Untei {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Untei {
    /// Create a new Untei builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Extract header metadata only.
    pub fn header_only(mut self) -> Self {
        self.parse_options = self.parse_options.header_only();
        self
    }

    /// Set the format used for full publication dates.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_date_format(format);
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Render the abstract before the body.
    pub fn with_abstract(mut self) -> Self {
        self.render_options = self.render_options.with_abstract(true);
        self
    }

    /// Leave back-matter content out of rendered output.
    pub fn without_annex(mut self) -> Self {
        self.render_options = self.render_options.with_annex(false);
        self
    }

    /// Leave the references section out of Markdown output.
    pub fn without_references(mut self) -> Self {
        self.render_options = self.render_options.with_references(false);
        self
    }

    /// Parse a TEI file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<UnteiResult> {
        let parser = TeiParser::open_with_options(path, self.parse_options)?;
        let document = parser.parse()?;
        Ok(UnteiResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse TEI from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<UnteiResult> {
        let parser = TeiParser::from_bytes_with_options(data, self.parse_options)?;
        let document = parser.parse()?;
        Ok(UnteiResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Untei {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a TEI document.
pub struct UnteiResult {
    /// The parsed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl UnteiResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document, &self.render_options)
    }

    /// Build the structured record.
    pub fn to_record(&self) -> Record {
        render::to_record(&self.document)
    }

    /// Convert the structured record to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
