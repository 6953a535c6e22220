//! Structured record rendering.
//!
//! The record is the nested key/value view of a [`Document`]: bibliographic
//! metadata, body text entries with inline references, figures and tables,
//! annex content and references. Absent values are omitted when serialized,
//! except a reference's `type`, which is always written.

use serde::{Deserialize, Serialize};

use crate::model::{Citation, ContentFragment, Coordinate, Document, InlineRef};

/// Structured record of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Bibliographic metadata
    pub biblio: Biblio,
    /// Paragraphs and formulas of the body, in document order
    pub body_text: Vec<BodyEntry>,
    /// Figures and tables of the body
    pub figures_and_tables: Vec<FigureEntry>,
    /// Back-matter paragraphs and formulas
    pub annex: Vec<BodyEntry>,
    /// Bibliography
    pub references: Vec<ReferenceEntry>,
}

impl Record {
    /// Convert to a generic JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Bibliographic metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biblio {
    /// Main title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Header authors in source order
    pub authors: Vec<AuthorEntry>,
    /// Header affiliations in source order
    pub affiliations: Vec<String>,
    /// Machine-readable date as written in the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    /// DOI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Publisher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Abstract paragraphs and formulas
    #[serde(rename = "abstract")]
    pub abstract_text: Vec<BodyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
    /// Full name
    pub name: String,
}

/// A paragraph or formula entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyEntry {
    /// "p_{n}" for paragraphs, "eq_{n}" for formulas
    pub id: String,
    /// "paragraph" or "formula"
    #[serde(rename = "type")]
    pub kind: String,
    /// Paragraph text, or formula text without its label
    pub text: String,
    /// Heading of the enclosing section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_section: Option<String>,
    /// Inline references, paragraphs only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<RefEntry>,
    /// Formula label such as "(1)"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Always present for formulas, possibly empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Vec<Coordinate>>,
    /// Source `xml:id` of a formula
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_id: Option<String>,
}

/// An inline reference inside a paragraph entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefEntry {
    /// Reference type ("bibr", "figure", ...), `null` when the source has none
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Target anchor such as "#b0"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Visible marker text
    pub text: String,
    /// Char offset of the marker start in the paragraph text
    pub offset_start: usize,
    /// Char offset just past the marker end
    pub offset_end: usize,
}

impl From<&InlineRef> for RefEntry {
    fn from(r: &InlineRef) -> Self {
        Self {
            kind: r.kind.clone(),
            target: r.target.clone(),
            text: r.text.clone(),
            offset_start: r.offset_start,
            offset_end: r.offset_end,
        }
    }
}

/// A figure or table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureEntry {
    /// "figure" or "table"
    #[serde(rename = "type")]
    pub kind: String,
    /// Source `xml:id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Label such as "1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Head text such as "Fig. 1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Caption from `figDesc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Cell text by row, tables only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<String>>>,
    /// Heading of the enclosing section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_section: Option<String>,
}

/// A bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// 1-based position in the bibliography
    pub ordinal: u32,
    /// Article title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Author names
    pub authors: Vec<String>,
    /// Journal or monograph title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Publication date as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl From<&Citation> for ReferenceEntry {
    fn from(c: &Citation) -> Self {
        Self {
            ordinal: c.ordinal,
            title: c.title.clone(),
            authors: c.authors.clone(),
            venue: c.venue.clone(),
            date: c.date.clone(),
        }
    }
}

/// Build the structured record of a document.
pub fn to_record(doc: &Document) -> Record {
    let mut builder = EntryBuilder::default();

    let abstract_text = doc
        .abstract_fragments
        .iter()
        .filter_map(|f| builder.entry(f, None))
        .collect();

    let mut body_text = Vec::new();
    let mut figures_and_tables = Vec::new();
    for (heading, fragment) in doc.body_fragments() {
        match builder.entry(fragment, heading) {
            Some(entry) => body_text.push(entry),
            None => figures_and_tables.extend(figure_entry(fragment, heading)),
        }
    }

    let annex = doc
        .annex
        .iter()
        .filter_map(|f| builder.entry(f, None))
        .collect();

    Record {
        biblio: Biblio {
            title: doc.title.clone(),
            authors: doc
                .authors
                .iter()
                .map(|a| AuthorEntry {
                    name: a.name.clone(),
                })
                .collect(),
            affiliations: doc.affiliations.clone(),
            publication_date: doc.publication_date.as_ref().map(|d| d.raw.clone()),
            doi: doc.doi.clone(),
            publisher: doc.publisher.clone(),
            abstract_text,
        },
        body_text,
        figures_and_tables,
        annex,
        references: doc.bibliography.iter().map(ReferenceEntry::from).collect(),
    }
}

/// Assigns paragraph ids in record order.
#[derive(Default)]
struct EntryBuilder {
    paragraph_count: usize,
}

impl EntryBuilder {
    /// Entry for a paragraph or formula; `None` for figures and tables.
    fn entry(&mut self, fragment: &ContentFragment, heading: Option<&str>) -> Option<BodyEntry> {
        let head_section = heading.map(str::to_string);
        match fragment {
            ContentFragment::Paragraph(p) => {
                let id = format!("p_{}", self.paragraph_count);
                self.paragraph_count += 1;
                Some(BodyEntry {
                    id,
                    kind: "paragraph".to_string(),
                    text: p.text.clone(),
                    head_section,
                    refs: p.refs.iter().map(RefEntry::from).collect(),
                    label: None,
                    coords: None,
                    xml_id: None,
                })
            }
            ContentFragment::Formula(f) => Some(BodyEntry {
                id: f.id.clone().unwrap_or_default(),
                kind: "formula".to_string(),
                text: f.text.clone(),
                head_section,
                refs: Vec::new(),
                label: f.label.clone(),
                coords: Some(f.coords.clone()),
                xml_id: f.xml_id.clone(),
            }),
            ContentFragment::Figure(_) | ContentFragment::Table(_) => None,
        }
    }
}

fn figure_entry(fragment: &ContentFragment, heading: Option<&str>) -> Option<FigureEntry> {
    let head_section = heading.map(str::to_string);
    match fragment {
        ContentFragment::Figure(f) => Some(FigureEntry {
            kind: "figure".to_string(),
            id: f.id.clone(),
            label: f.label.clone(),
            head: f.head.clone(),
            caption: f.caption.clone(),
            rows: None,
            head_section,
        }),
        ContentFragment::Table(t) => Some(FigureEntry {
            kind: "table".to_string(),
            id: t.id.clone(),
            label: t.label.clone(),
            head: None,
            caption: t.caption.clone(),
            rows: Some(t.rows.clone()),
            head_section,
        }),
        ContentFragment::Paragraph(_) | ContentFragment::Formula(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Figure, Formula, Paragraph, PublicationDate, Section};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.title = Some("Title".to_string());
        doc.authors.push(Author {
            name: "A B".to_string(),
        });
        doc.publication_date = Some(PublicationDate {
            raw: "2016-03-08".to_string(),
            formatted: "March 08, 2016".to_string(),
        });

        let mut paragraph = Paragraph::with_text("See [1].");
        paragraph.refs.push(InlineRef {
            kind: Some("bibr".to_string()),
            target: Some("#b0".to_string()),
            text: "[1]".to_string(),
            offset_start: 4,
            offset_end: 7,
        });

        let mut section = Section::new(Some("Intro".to_string()));
        section.fragments.push(ContentFragment::Paragraph(paragraph));
        section.fragments.push(ContentFragment::Formula(Formula {
            id: Some("eq_0".to_string()),
            label: Some("(1)".to_string()),
            text: "x = 1".to_string(),
            coords: Vec::new(),
            xml_id: Some("formula_0".to_string()),
        }));
        section.fragments.push(ContentFragment::Figure(Figure {
            caption: Some("A plot.".to_string()),
            ..Default::default()
        }));
        doc.sections.push(section);
        doc
    }

    #[test]
    fn test_record_structure() {
        let record = to_record(&sample());
        assert_eq!(record.biblio.title.as_deref(), Some("Title"));
        assert_eq!(record.biblio.authors[0].name, "A B");
        assert_eq!(record.biblio.publication_date.as_deref(), Some("2016-03-08"));

        assert_eq!(record.body_text.len(), 2);
        let paragraph = &record.body_text[0];
        assert_eq!(paragraph.id, "p_0");
        assert_eq!(paragraph.kind, "paragraph");
        assert_eq!(paragraph.head_section.as_deref(), Some("Intro"));
        assert_eq!(paragraph.refs[0].offset_start, 4);

        let formula = &record.body_text[1];
        assert_eq!(formula.kind, "formula");
        assert_eq!(formula.label.as_deref(), Some("(1)"));
        assert_eq!(formula.coords, Some(Vec::new()));

        assert_eq!(record.figures_and_tables.len(), 1);
        assert_eq!(record.figures_and_tables[0].kind, "figure");
    }

    #[test]
    fn test_record_json_shape() {
        let value = to_record(&sample()).to_value();
        assert_eq!(value["biblio"]["title"], "Title");
        assert_eq!(value["biblio"]["publication_date"], "2016-03-08");
        assert_eq!(value["body_text"][0]["type"], "paragraph");
        assert_eq!(value["body_text"][0]["refs"][0]["type"], "bibr");
        assert_eq!(value["body_text"][1]["xml_id"], "formula_0");
        assert!(value["body_text"][1]["coords"].is_array());
        assert!(value["body_text"][0].get("coords").is_none());
    }

    #[test]
    fn test_untyped_ref_keeps_type_key() {
        let mut paragraph = Paragraph::with_text("See above.");
        paragraph.refs.push(InlineRef {
            kind: None,
            target: None,
            text: "above".to_string(),
            offset_start: 4,
            offset_end: 9,
        });
        let mut doc = Document::new();
        let mut section = Section::new(None);
        section.fragments.push(ContentFragment::Paragraph(paragraph));
        doc.sections.push(section);

        let value = to_record(&doc).to_value();
        let r = &value["body_text"][0]["refs"][0];
        assert!(r.get("type").is_some_and(serde_json::Value::is_null));
        assert!(r.get("target").is_none());
    }

    #[test]
    fn test_empty_document_record() {
        let value = to_record(&Document::new()).to_value();
        assert!(value["biblio"].get("title").is_none());
        assert_eq!(value["body_text"], serde_json::json!([]));
        assert_eq!(value["references"], serde_json::json!([]));
    }
}
