//! Body section assembly and annex flattening.

use super::content::{ElementKind, Normalizer};
use crate::model::{ContentFragment, Section};
use crate::tree::{Element, Node};

/// Assemble body sections in document order.
///
/// Every `div` at any depth becomes a section headed by its first direct
/// `head` child. A nested `div` closes the enclosing section; content after
/// it continues in a section without heading. Content outside any `div`
/// forms heading-less sections.
pub fn assemble_body(body: &Element, normalizer: &mut Normalizer) -> Vec<Section> {
    let mut sections = Vec::new();
    assemble(body, false, normalizer, &mut sections);
    sections
}

fn assemble(
    element: &Element,
    take_head: bool,
    normalizer: &mut Normalizer,
    out: &mut Vec<Section>,
) {
    let head_index = if take_head {
        element
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| e.is("head")))
    } else {
        None
    };

    let heading = head_index
        .and_then(|i| element.children[i].as_element())
        .and_then(Element::collapsed_text);
    let mut current = Section::new(heading);
    let mut run: Vec<&Node> = Vec::new();

    for (index, node) in element.children.iter().enumerate() {
        if Some(index) == head_index {
            continue;
        }
        match node.as_element() {
            Some(div) if div.is("div") => {
                current.fragments.extend(normalizer.normalize_nodes(run.drain(..)));
                push_section(out, current);
                assemble(div, true, normalizer, out);
                current = Section::new(None);
            }
            _ => run.push(node),
        }
    }

    current.fragments.extend(normalizer.normalize_nodes(run));
    push_section(out, current);
}

fn push_section(out: &mut Vec<Section>, section: Section) {
    if !section.is_empty() {
        out.push(section);
    }
}

/// Flatten back matter (or an abstract) into a heading-less fragment list.
///
/// Divisions are descended, headings dropped and bibliography lists
/// skipped. Content between them is normalized as one run, so inline
/// markers stay inside their paragraph.
pub fn flatten(element: &Element, normalizer: &mut Normalizer) -> Vec<ContentFragment> {
    let mut fragments = Vec::new();
    flatten_into(element, normalizer, &mut fragments);
    fragments
}

fn flatten_into(element: &Element, normalizer: &mut Normalizer, out: &mut Vec<ContentFragment>) {
    let mut run: Vec<&Node> = Vec::new();

    for node in &element.children {
        match node.as_element() {
            Some(child) => match ElementKind::of(child) {
                ElementKind::Bibliography | ElementKind::Head => {
                    out.extend(normalizer.normalize_nodes(run.drain(..)));
                }
                ElementKind::Division => {
                    out.extend(normalizer.normalize_nodes(run.drain(..)));
                    flatten_into(child, normalizer, out);
                }
                _ => run.push(node),
            },
            None => run.push(node),
        }
    }

    out.extend(normalizer.normalize_nodes(run));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_str;

    fn body(xml: &str) -> Vec<Section> {
        let tree = parse_str(xml).unwrap();
        assemble_body(&tree.root, &mut Normalizer::new())
    }

    fn headings(sections: &[Section]) -> Vec<Option<&str>> {
        sections.iter().map(|s| s.heading.as_deref()).collect()
    }

    #[test]
    fn test_sections_in_order() {
        let sections = body(
            r#"<body>
                <div><head>Introduction</head><p>Intro text.</p></div>
                <div><head n="2">Methods</head><p>One.</p><p>Two.</p></div>
            </body>"#,
        );
        assert_eq!(headings(&sections), vec![Some("Introduction"), Some("Methods")]);
        assert_eq!(sections[1].fragments.len(), 2);
    }

    #[test]
    fn test_nested_divs_flatten() {
        let sections = body(
            r#"<body><div><head>Outer</head><p>a</p>
                <div><head>Inner</head><p>b</p></div>
                <p>c</p>
            </div></body>"#,
        );
        assert_eq!(headings(&sections), vec![Some("Outer"), Some("Inner"), None]);
        assert_eq!(sections[2].fragments[0].plain_text(), "c");
    }

    #[test]
    fn test_heading_only_section_is_kept() {
        let sections = body("<body><div><head>Empty</head></div></body>");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].fragments.is_empty());
    }

    #[test]
    fn test_content_outside_divs() {
        let sections = body(
            r#"<body><div><head>Results</head><p>r</p></div>
                <figure><figDesc>Plot.</figDesc></figure></body>"#,
        );
        assert_eq!(headings(&sections), vec![Some("Results"), None]);
        assert_eq!(sections[1].fragments[0].plain_text(), "Plot.");
    }

    #[test]
    fn test_only_first_head_is_heading() {
        let sections = body("<body><div><head>One</head><head>Two</head><p>x</p></div></body>");
        assert_eq!(sections[0].heading.as_deref(), Some("One"));
        let texts: Vec<_> = sections[0].fragments.iter().map(|f| f.plain_text()).collect();
        assert_eq!(texts, vec!["Two", "x"]);
    }

    #[test]
    fn test_flatten_back() {
        let tree = parse_str(
            r#"<back>
                <div type="acknowledgement"><div><head>Acknowledgements</head><p>Thanks.</p></div></div>
                <div type="annex"><p>Extra.</p><formula>x=1</formula></div>
                <div type="references"><listBibl><biblStruct/></listBibl></div>
            </back>"#,
        )
        .unwrap();
        let fragments = flatten(&tree.root, &mut Normalizer::new());
        let texts: Vec<_> = fragments.iter().map(|f| f.plain_text()).collect();
        assert_eq!(texts, vec!["Thanks.", "Extra.", "x=1"]);
        assert!(fragments[2].is_formula());
    }

    #[test]
    fn test_flatten_text_children() {
        let tree = parse_str("<abstract>Loose text <ref>[1]</ref><p>Para.</p></abstract>").unwrap();
        let fragments = flatten(&tree.root, &mut Normalizer::new());
        let texts: Vec<_> = fragments.iter().map(|f| f.plain_text()).collect();
        assert_eq!(texts, vec!["Loose text [1]", "Para."]);
    }

    #[test]
    fn test_flatten_keeps_marker_in_paragraph() {
        let tree = parse_str(
            r#"<back><div type="acknowledgement">We thank <ref type="bibr">Smith</ref> for help.</div></back>"#,
        )
        .unwrap();
        let fragments = flatten(&tree.root, &mut Normalizer::new());

        assert_eq!(fragments.len(), 1);
        let para = fragments[0].as_paragraph().unwrap();
        assert_eq!(para.text, "We thank Smith for help.");
        assert_eq!(para.refs.len(), 1);
        assert_eq!(para.refs[0].text, "Smith");
    }

    #[test]
    fn test_flatten_splits_runs_at_headings() {
        let tree = parse_str("<div>before<head>H</head>after</div>").unwrap();
        let fragments = flatten(&tree.root, &mut Normalizer::new());
        let texts: Vec<_> = fragments.iter().map(|f| f.plain_text()).collect();
        assert_eq!(texts, vec!["before", "after"]);
    }
}
