//! Header metadata extraction.

use crate::model::{Author, PublicationDate};
use crate::tree::Element;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write;

/// Metadata found in the `teiHeader` zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Main title
    pub title: Option<String>,
    /// Header authors
    pub authors: Vec<Author>,
    /// Header affiliations
    pub affiliations: Vec<String>,
    /// Publication date
    pub publication_date: Option<PublicationDate>,
    /// DOI
    pub doi: Option<String>,
    /// Publisher
    pub publisher: Option<String>,
}

impl Metadata {
    /// Extract metadata from a header element.
    ///
    /// Every lookup is scoped to the header, so bibliography entries in the
    /// back matter never contribute authors or titles.
    pub fn extract(header: &Element, date_format: &str) -> Self {
        let metadata = Self {
            title: extract_title(header),
            authors: header
                .find_all("author")
                .filter_map(person_name)
                .map(|name| Author { name })
                .collect(),
            // Collapsed rather than trimmed: GROBID splits orgName parts
            // across lines.
            affiliations: header
                .find_all("affiliation")
                .filter_map(Element::collapsed_text)
                .collect(),
            publication_date: extract_date(header, date_format),
            doi: header
                .find_where("idno", |e| {
                    e.attr("type")
                        .is_some_and(|t| t.eq_ignore_ascii_case("DOI"))
                })
                .and_then(Element::trimmed_text),
            publisher: header.find("publisher").and_then(Element::collapsed_text),
        };

        if metadata.title.is_none() {
            log::debug!("Header has no title");
        }
        if metadata.authors.is_empty() {
            log::debug!("Header has no authors");
        }
        metadata
    }
}

fn extract_title(header: &Element) -> Option<String> {
    header
        .find_where("title", |e| {
            e.attr("type") == Some("main") && e.attr("level") == Some("a")
        })
        .and_then(Element::collapsed_text)
        .or_else(|| {
            header
                .find("titleStmt")
                .and_then(|stmt| stmt.find("title"))
                .and_then(Element::collapsed_text)
        })
}

/// All forename parts of a name, joined by a space.
fn forenames(name: &Element) -> Option<String> {
    let parts: Vec<String> = name
        .find_all("forename")
        .filter_map(Element::collapsed_text)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn surname(name: &Element) -> Option<String> {
    name.find("surname").and_then(Element::collapsed_text)
}

/// Assemble a person name from an `author` (or `persName`) element.
pub(crate) fn person_name(element: &Element) -> Option<String> {
    Author::from_parts(forenames(element).as_deref(), surname(element).as_deref()).map(|a| a.name)
}

fn extract_date(header: &Element, date_format: &str) -> Option<PublicationDate> {
    let date = header.find_where("date", |e| e.attr("type") == Some("published"))?;
    let raw = match date.attr("when").map(str::trim) {
        Some(when) if !when.is_empty() => when.to_string(),
        _ => {
            log::debug!("Published date has no when attribute");
            return None;
        }
    };

    let formatted = format_date(&raw, date_format).unwrap_or_else(|| raw.clone());
    Some(PublicationDate { raw, formatted })
}

/// Format an ISO date value in long form.
///
/// `YYYY-MM-DD` uses `date_format`, `YYYY-MM` is rendered as month and
/// year. Anything else (including an invalid format string) yields `None`.
pub(crate) fn format_date(raw: &str, date_format: &str) -> Option<String> {
    // Datetime values: keep the date part.
    let value = match raw.split_once('T') {
        Some((date, _)) => date,
        None => raw,
    };

    let (date, format) = match value.len() {
        10 => (NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?, date_format),
        7 => (
            NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok()?,
            "%B %Y",
        ),
        _ => return None,
    };

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        log::warn!("Invalid date format {:?}", format);
        return None;
    }

    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DEFAULT_DATE_FORMAT;
    use crate::tree::parse_str;

    const HEADER: &str = r#"<teiHeader>
        <fileDesc>
            <titleStmt>
                <title level="a" type="main">Sample   Document
                    Title</title>
            </titleStmt>
            <publicationStmt>
                <publisher>ACM</publisher>
                <date type="published" when="2016-03-08">8 March 2016</date>
            </publicationStmt>
            <sourceDesc>
                <biblStruct>
                    <analytic>
                        <author>
                            <persName><forename type="first">A</forename><surname>B</surname></persName>
                            <affiliation><orgName>University   of X</orgName></affiliation>
                        </author>
                        <author>
                            <persName><forename type="first">John</forename><forename type="middle">Q</forename><surname>Public</surname></persName>
                        </author>
                        <author><persName><surname>Solo</surname></persName></author>
                        <author><persName/></author>
                    </analytic>
                    <idno type="DOI">10.1145/123</idno>
                </biblStruct>
            </sourceDesc>
        </fileDesc>
    </teiHeader>"#;

    fn metadata(xml: &str) -> Metadata {
        let tree = parse_str(xml).unwrap();
        Metadata::extract(&tree.root, DEFAULT_DATE_FORMAT)
    }

    #[test]
    fn test_extract_full_header() {
        let meta = metadata(HEADER);
        assert_eq!(meta.title.as_deref(), Some("Sample Document Title"));

        let names: Vec<_> = meta.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A B", "John Q Public", "Solo"]);

        assert_eq!(meta.affiliations, vec!["University of X"]);
        assert_eq!(meta.doi.as_deref(), Some("10.1145/123"));
        assert_eq!(meta.publisher.as_deref(), Some("ACM"));

        let date = meta.publication_date.unwrap();
        assert_eq!(date.raw, "2016-03-08");
        assert_eq!(date.formatted, "March 08, 2016");
    }

    #[test]
    fn test_repeated_authors_and_affiliations_kept() {
        let meta = metadata(
            r#"<teiHeader>
                <author><persName><forename>Kim</forename><surname>Lee</surname></persName>
                    <affiliation>Lab A</affiliation></author>
                <author><persName><forename>Sam</forename><surname>Park</surname></persName>
                    <affiliation>Lab B</affiliation></author>
                <author><persName><forename>Kim</forename><surname>Lee</surname></persName>
                    <affiliation>Lab A</affiliation></author>
            </teiHeader>"#,
        );

        let names: Vec<_> = meta.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Kim Lee", "Sam Park", "Kim Lee"]);
        assert_eq!(meta.affiliations, vec!["Lab A", "Lab B", "Lab A"]);
    }

    #[test]
    fn test_title_fallback() {
        let meta = metadata("<teiHeader><titleStmt><title>Plain</title></titleStmt></teiHeader>");
        assert_eq!(meta.title.as_deref(), Some("Plain"));
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(metadata("<teiHeader/>"), Metadata::default());
    }

    #[test]
    fn test_date_without_when_is_absent() {
        let meta = metadata(r#"<teiHeader><date type="published">2016</date></teiHeader>"#);
        assert!(meta.publication_date.is_none());
    }

    #[test]
    fn test_unparseable_date_kept_raw() {
        let meta = metadata(r#"<teiHeader><date type="published" when="2016"/></teiHeader>"#);
        let date = meta.publication_date.unwrap();
        assert_eq!(date.raw, "2016");
        assert_eq!(date.formatted, "2016");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date("2016-03-08", DEFAULT_DATE_FORMAT).as_deref(),
            Some("March 08, 2016")
        );
        assert_eq!(
            format_date("2016-03", DEFAULT_DATE_FORMAT).as_deref(),
            Some("March 2016")
        );
        assert_eq!(
            format_date("2016-03-08T10:00:00", "%d/%m/%Y").as_deref(),
            Some("08/03/2016")
        );
        assert_eq!(format_date("2016-13-40", DEFAULT_DATE_FORMAT), None);
        assert_eq!(format_date("2016-03-08", "%Q"), None);
    }

    #[test]
    fn test_person_name() {
        let tree = parse_str(
            "<author><persName><forename>Ada</forename><surname>Lovelace</surname></persName></author>",
        )
        .unwrap();
        assert_eq!(person_name(&tree.root).as_deref(), Some("Ada Lovelace"));
    }
}
