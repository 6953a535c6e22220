//! Bibliography extraction.

use super::metadata::person_name;
use crate::model::Citation;
use crate::tree::Element;

/// Extract citations from a `listBibl` element.
///
/// Ordinals follow list order starting at 1. Entries with no usable
/// fields still occupy their ordinal.
pub fn extract(list: &Element) -> Vec<Citation> {
    let citations: Vec<Citation> = list
        .find_all("biblStruct")
        .zip(1u32..)
        .map(|(entry, ordinal)| citation(entry, ordinal))
        .collect();

    debug_assert!(
        citations.windows(2).all(|w| w[0].ordinal < w[1].ordinal),
        "citation ordinals must be strictly increasing"
    );
    log::debug!("Extracted {} citations", citations.len());
    citations
}

fn citation(entry: &Element, ordinal: u32) -> Citation {
    let mut citation = Citation::new(ordinal);

    citation.title = titled(entry, "a");
    citation.authors = entry.find_all("author").filter_map(person_name).collect();
    citation.venue = titled(entry, "j").or_else(|| titled(entry, "m"));
    citation.date = entry.find("date").and_then(|date| {
        date.trimmed_text()
            .or_else(|| date.attr("when").map(str::trim).filter(|w| !w.is_empty()).map(str::to_string))
    });

    if citation.is_empty() {
        log::debug!("Citation [{}] has no title, authors or venue", ordinal);
    }
    citation
}

fn titled(entry: &Element, level: &str) -> Option<String> {
    entry
        .find_where("title", |t| t.attr("level") == Some(level))
        .and_then(Element::collapsed_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_str;

    fn citations(xml: &str) -> Vec<Citation> {
        let tree = parse_str(xml).unwrap();
        extract(&tree.root)
    }

    #[test]
    fn test_extract_entries() {
        let list = citations(
            r#"<listBibl>
                <biblStruct xml:id="b0">
                    <analytic>
                        <title level="a" type="main">Deep   learning</title>
                        <author><persName><forename>Y</forename><surname>LeCun</surname></persName></author>
                        <author><persName><forename>Y</forename><surname>Bengio</surname></persName></author>
                        <author><persName><forename>G</forename><surname>Hinton</surname></persName></author>
                    </analytic>
                    <monogr>
                        <title level="j">Nature</title>
                        <imprint><date type="published" when="2015">2015</date></imprint>
                    </monogr>
                </biblStruct>
                <biblStruct xml:id="b1">
                    <monogr>
                        <title level="m">A Book</title>
                        <imprint><date type="published" when="1999-05"/></imprint>
                    </monogr>
                </biblStruct>
                <biblStruct/>
            </listBibl>"#,
        );

        assert_eq!(list.len(), 3);
        let ordinals: Vec<_> = list.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);

        assert_eq!(list[0].title.as_deref(), Some("Deep learning"));
        assert_eq!(list[0].authors, vec!["Y LeCun", "Y Bengio", "G Hinton"]);
        assert_eq!(list[0].venue.as_deref(), Some("Nature"));
        assert_eq!(list[0].date.as_deref(), Some("2015"));

        assert_eq!(list[1].title, None);
        assert_eq!(list[1].venue.as_deref(), Some("A Book"));
        assert_eq!(list[1].date.as_deref(), Some("1999-05"));

        assert!(list[2].is_empty());
    }

    #[test]
    fn test_empty_list() {
        assert!(citations("<listBibl/>").is_empty());
    }
}
