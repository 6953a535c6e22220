//! Content fragments: the units of section content.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// One unit of section content, kept in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentFragment {
    /// Running text
    Paragraph(Paragraph),
    /// A figure, represented by its caption
    Figure(Figure),
    /// A table with at least one row
    Table(Table),
    /// A display formula; present even when its text is empty
    Formula(Formula),
}

impl ContentFragment {
    /// Get the paragraph if this fragment is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            ContentFragment::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Get the formula if this fragment is one.
    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            ContentFragment::Formula(f) => Some(f),
            _ => None,
        }
    }

    /// Check if this is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContentFragment::Paragraph(_))
    }

    /// Check if this is a formula.
    pub fn is_formula(&self) -> bool {
        matches!(self, ContentFragment::Formula(_))
    }

    /// Plain text content of the fragment.
    pub fn plain_text(&self) -> String {
        match self {
            ContentFragment::Paragraph(p) => p.text.clone(),
            ContentFragment::Figure(f) => f.caption.clone().unwrap_or_default(),
            ContentFragment::Table(t) => t.plain_text(),
            ContentFragment::Formula(f) => match f.label {
                Some(ref label) if !f.text.is_empty() => format!("{} {}", f.text, label),
                Some(ref label) => label.clone(),
                None => f.text.clone(),
            },
        }
    }
}

/// A figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// `xml:id` of the figure
    pub id: Option<String>,

    /// Figure label (e.g. "1")
    pub label: Option<String>,

    /// Figure head (e.g. "Fig. 1")
    pub head: Option<String>,

    /// Caption from the figure description
    pub caption: Option<String>,
}

/// A display formula.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    /// Document-wide formula identifier assigned during extraction
    pub id: Option<String>,

    /// Equation label (e.g. "(1)"), kept out of `text`
    pub label: Option<String>,

    /// Formula text, trimmed; empty for an empty formula element
    pub text: String,

    /// Page regions covered by the formula
    pub coords: Vec<Coordinate>,

    /// `xml:id` attribute from the source
    pub xml_id: Option<String>,
}

/// A rectangular region on a page, as written in TEI `coords` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Page number (1-indexed)
    pub page: u32,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Coordinate {
    /// Parse a `coords` attribute: `page,x,y,w,h` boxes separated by `;`.
    ///
    /// Malformed boxes are skipped.
    pub fn parse_list(raw: &str) -> Vec<Coordinate> {
        raw.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|segment| {
                let coord = Self::parse_one(segment);
                if coord.is_none() {
                    log::debug!("Skipping malformed coordinate box {:?}", segment);
                }
                coord
            })
            .collect()
    }

    fn parse_one(segment: &str) -> Option<Coordinate> {
        let parts: Vec<&str> = segment.split(',').map(str::trim).collect();
        if parts.len() != 5 {
            return None;
        }
        Some(Coordinate {
            page: parts[0].parse().ok()?,
            x: parts[1].parse().ok()?,
            y: parts[2].parse().ok()?,
            w: parts[3].parse().ok()?,
            h: parts[4].parse().ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coords() {
        let coords = Coordinate::parse_list("3,72.00,155.31,210.5,9.96;4,72,80,100,12");
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].page, 3);
        assert_eq!(coords[0].y, 155.31);
        assert_eq!(coords[1].page, 4);
    }

    #[test]
    fn test_parse_coords_skips_malformed() {
        let coords = Coordinate::parse_list("1,2,3;x,1,2,3,4;2,1,1,1,1;");
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].page, 2);
        assert!(Coordinate::parse_list("").is_empty());
    }

    #[test]
    fn test_formula_plain_text() {
        let labelled = ContentFragment::Formula(Formula {
            label: Some("(1)".to_string()),
            text: "E = mc^2".to_string(),
            ..Default::default()
        });
        assert_eq!(labelled.plain_text(), "E = mc^2 (1)");

        let empty = ContentFragment::Formula(Formula::default());
        assert!(empty.is_formula());
        assert_eq!(empty.plain_text(), "");
    }

    #[test]
    fn test_fragment_serializes_with_type_tag() {
        let fragment = ContentFragment::Paragraph(Paragraph::with_text("Hi"));
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["text"], "Hi");
    }
}
