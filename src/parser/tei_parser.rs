//! TEI document parser.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Document;
use crate::tree::{self, Element, XmlTree};

use super::bibliography;
use super::content::Normalizer;
use super::metadata::Metadata;
use super::options::{ErrorMode, ExtractMode, ParseOptions};
use super::sections;
use super::zones::Zones;

/// TEI document parser.
pub struct TeiParser {
    tree: XmlTree,
    options: ParseOptions,
}

impl TeiParser {
    /// Open a TEI file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a TEI file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse TEI from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse TEI from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let tree = tree::parse_bytes(data)?;
        Ok(Self { tree, options })
    }

    /// Parse TEI from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self> {
        Self::from_str_with_options(text, ParseOptions::default())
    }

    /// Parse TEI from a string with custom options.
    pub fn from_str_with_options(text: &str, options: ParseOptions) -> Result<Self> {
        let tree = tree::parse_str(text)?;
        Ok(Self { tree, options })
    }

    /// Parse TEI from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse TEI from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Get the loaded tree.
    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Parse the document and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        let tei = self.tei_root()?;
        let zones = Zones::locate(tei);
        let mut document = Document::new();

        // One normalizer per document keeps formula ids unique.
        let mut normalizer = Normalizer::new();

        if let Some(header) = zones.header {
            let metadata = Metadata::extract(header, &self.options.date_format);
            document.title = metadata.title;
            document.authors = metadata.authors;
            document.affiliations = metadata.affiliations;
            document.publication_date = metadata.publication_date;
            document.doi = metadata.doi;
            document.publisher = metadata.publisher;

            if let Some(abstract_element) = header.find("abstract") {
                document.abstract_fragments = sections::flatten(abstract_element, &mut normalizer);
            }
        }

        if self.options.extract_mode == ExtractMode::HeaderOnly {
            return Ok(document);
        }

        if let Some(body) = zones.body {
            document.sections = sections::assemble_body(body, &mut normalizer);
        }
        if let Some(back) = zones.back {
            document.annex = sections::flatten(back, &mut normalizer);
        }
        if let Some(list) = zones.bibliography {
            document.bibliography = bibliography::extract(list);
        }

        log::debug!(
            "Parsed TEI document: {} sections, {} annex fragments, {} citations",
            document.sections.len(),
            document.annex.len(),
            document.bibliography.len()
        );

        Ok(document)
    }

    /// Resolve the `TEI` element to extract from.
    fn tei_root(&self) -> Result<&Element> {
        let root = &self.tree.root;
        if root.is("TEI") {
            return Ok(root);
        }

        if root.is("teiCorpus") && self.options.error_mode == ErrorMode::Lenient {
            if let Some(tei) = root.find("TEI") {
                log::warn!("Using first TEI document of teiCorpus");
                return Ok(tei);
            }
        }

        Err(Error::MissingRoot(root.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
    <teiHeader>
        <fileDesc>
            <titleStmt><title level="a" type="main">Sample Document Title</title></titleStmt>
            <sourceDesc><biblStruct><analytic>
                <author><persName><forename>A</forename><surname>B</surname></persName></author>
            </analytic></biblStruct></sourceDesc>
        </fileDesc>
        <profileDesc><abstract><div><p>Short abstract.</p></div></abstract></profileDesc>
    </teiHeader>
    <text>
        <body>
            <div><head>Introduction</head>
                <p>A sample <ref type="bibr" target="#b0">[1]</ref>.</p>
                <formula xml:id="formula_0">E = mc^2<label>(1)</label></formula>
            </div>
        </body>
        <back>
            <div type="references"><listBibl>
                <biblStruct><analytic>
                    <title level="a">Cited work</title>
                    <author><persName><forename>C</forename><surname>D</surname></persName></author>
                </analytic></biblStruct>
            </listBibl></div>
        </back>
    </text>
</TEI>"##;

    #[test]
    fn test_parse_sample() {
        let doc = TeiParser::from_str(SAMPLE).unwrap().parse().unwrap();
        assert_eq!(doc.title.as_deref(), Some("Sample Document Title"));
        assert_eq!(doc.authors.len(), 1);
        assert_eq!(doc.authors[0].name, "A B");
        assert_eq!(doc.abstract_fragments.len(), 1);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading.as_deref(), Some("Introduction"));
        assert_eq!(doc.sections[0].fragments.len(), 2);
        assert!(doc.annex.is_empty());
        assert_eq!(doc.bibliography.len(), 1);
        assert_eq!(doc.bibliography[0].authors, vec!["C D"]);
    }

    #[test]
    fn test_header_only() {
        let options = ParseOptions::new().header_only();
        let doc = TeiParser::from_str_with_options(SAMPLE, options)
            .unwrap()
            .parse()
            .unwrap();
        assert!(doc.title.is_some());
        assert!(doc.sections.is_empty());
        assert!(doc.bibliography.is_empty());
    }

    #[test]
    fn test_missing_root() {
        let err = TeiParser::from_str("<html/>").unwrap().parse().unwrap_err();
        assert!(matches!(err, Error::MissingRoot(ref name) if name == "html"));
    }

    #[test]
    fn test_corpus_requires_lenient() {
        let xml = "<teiCorpus><TEI><teiHeader><titleStmt><title>T</title></titleStmt></teiHeader></TEI></teiCorpus>";
        assert!(TeiParser::from_str(xml).unwrap().parse().is_err());

        let doc = TeiParser::from_str_with_options(xml, ParseOptions::new().lenient())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(doc.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_empty_tei() {
        let doc = TeiParser::from_bytes(b"<TEI/>").unwrap().parse().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_from_reader() {
        let doc = TeiParser::from_reader(SAMPLE.as_bytes())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let parser = TeiParser::from_str(SAMPLE).unwrap();
        assert_eq!(parser.parse().unwrap(), parser.parse().unwrap());
    }
}
