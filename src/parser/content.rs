//! Mixed-content normalization.
//!
//! Walks the children of a content-bearing element (text interleaved with
//! citation markers, figures, tables and formulas) and linearizes them into
//! an ordered list of [`ContentFragment`]s. Order is always document order.

use crate::model::{ContentFragment, Coordinate, Figure, Formula, InlineRef, Paragraph, Table};
use crate::tree::{Element, Node};

/// Element kinds recognized during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    /// Inline reference (`ref`)
    Ref,
    /// `figure`
    Figure,
    /// `table`
    Table,
    /// `formula`
    Formula,
    /// Paragraph-level block (`p`, `ab`)
    Block,
    /// Section heading (`head`)
    Head,
    /// Division (`div`)
    Division,
    /// Bibliography list (`listBibl`)
    Bibliography,
    /// Anything else; contributes its text
    Other,
}

impl ElementKind {
    pub(crate) fn of(element: &Element) -> Self {
        match element.name.as_str() {
            "ref" => ElementKind::Ref,
            "figure" => ElementKind::Figure,
            "table" => ElementKind::Table,
            "formula" => ElementKind::Formula,
            "p" | "ab" => ElementKind::Block,
            "head" => ElementKind::Head,
            "div" => ElementKind::Division,
            "listBibl" => ElementKind::Bibliography,
            _ => ElementKind::Other,
        }
    }
}

/// Mixed-content normalizer.
///
/// One normalizer is used per document so that formula identifiers are
/// unique across sections, abstract and annex.
#[derive(Debug, Default)]
pub struct Normalizer {
    formula_count: usize,
}

impl Normalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize all children of an element.
    pub fn normalize(&mut self, element: &Element) -> Vec<ContentFragment> {
        self.normalize_nodes(&element.children)
    }

    /// Normalize a run of sibling nodes.
    pub fn normalize_nodes<'a, I>(&mut self, nodes: I) -> Vec<ContentFragment>
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let mut sink = FragmentSink::default();
        for node in nodes {
            self.visit(node, &mut sink);
        }
        sink.finish()
    }

    fn visit(&mut self, node: &Node, sink: &mut FragmentSink) {
        let element = match node {
            Node::Text(text) => {
                sink.paragraph.push_text(text);
                return;
            }
            Node::Element(element) => element,
        };

        match ElementKind::of(element) {
            ElementKind::Ref => sink.paragraph.push_ref(element),
            ElementKind::Figure => {
                sink.close_paragraph();
                if let Some(fragment) = figure_fragment(element) {
                    sink.fragments.push(fragment);
                }
            }
            ElementKind::Table => {
                sink.close_paragraph();
                if let Some(table) = table_from(element, None) {
                    sink.fragments.push(ContentFragment::Table(table));
                }
            }
            ElementKind::Formula => {
                sink.close_paragraph();
                let formula = self.formula(element);
                sink.fragments.push(ContentFragment::Formula(formula));
            }
            ElementKind::Block => {
                sink.close_paragraph();
                for child in &element.children {
                    self.visit(child, sink);
                }
                sink.close_paragraph();
            }
            ElementKind::Bibliography => {
                log::debug!("Skipping listBibl inside content");
            }
            ElementKind::Head | ElementKind::Division | ElementKind::Other => {
                sink.paragraph.push_inline(element);
            }
        }
    }

    fn formula(&mut self, element: &Element) -> Formula {
        let label = element.child("label").and_then(Element::collapsed_text);

        let mut text = String::new();
        for node in &element.children {
            match node {
                Node::Text(t) => text.push_str(t),
                Node::Element(e) if e.is("label") => {}
                Node::Element(e) => text.push_str(&e.text()),
            }
        }

        let id = format!("eq_{}", self.formula_count);
        self.formula_count += 1;

        if text.trim().is_empty() {
            log::debug!("Empty formula {}", id);
        }

        Formula {
            id: Some(id),
            label,
            text: text.trim().to_string(),
            coords: element
                .attr("coords")
                .map(Coordinate::parse_list)
                .unwrap_or_default(),
            xml_id: element.xml_id().map(str::to_string),
        }
    }
}

/// Collected fragments plus the open paragraph.
#[derive(Default)]
struct FragmentSink {
    fragments: Vec<ContentFragment>,
    paragraph: ParagraphBuilder,
}

impl FragmentSink {
    fn close_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            self.fragments.push(ContentFragment::Paragraph(paragraph));
        }
    }

    fn finish(mut self) -> Vec<ContentFragment> {
        self.close_paragraph();
        self.fragments
    }
}

/// Paragraph text accumulator tracking reference offsets in characters.
#[derive(Default)]
struct ParagraphBuilder {
    text: String,
    char_len: usize,
    refs: Vec<InlineRef>,
}

impl ParagraphBuilder {
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.char_len += text.chars().count();
    }

    /// Append a reference's visible text verbatim and record its span.
    fn push_ref(&mut self, element: &Element) {
        let raw = element.text();
        let visible = raw.trim();
        if !visible.is_empty() {
            let leading = raw.chars().take_while(|c| c.is_whitespace()).count();
            let offset_start = self.char_len + leading;
            self.refs.push(InlineRef {
                kind: element.attr("type").map(str::to_string),
                target: element.attr("target").map(str::to_string),
                text: visible.to_string(),
                offset_start,
                offset_end: offset_start + visible.chars().count(),
            });
        }
        self.push_text(&raw);
    }

    /// Append an element's text, keeping nested references.
    fn push_inline(&mut self, element: &Element) {
        for node in &element.children {
            match node {
                Node::Text(t) => self.push_text(t),
                Node::Element(e) if e.is("ref") => self.push_ref(e),
                Node::Element(e) => self.push_inline(e),
            }
        }
    }

    /// Close the paragraph; whitespace-only text yields nothing.
    fn take(&mut self) -> Option<Paragraph> {
        let builder = std::mem::take(self);
        let trimmed = builder.text.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Reference spans start on non-whitespace, so they survive the trim.
        let leading = builder
            .text
            .chars()
            .take_while(|c| c.is_whitespace())
            .count();
        let refs = builder
            .refs
            .into_iter()
            .map(|mut r| {
                r.offset_start -= leading;
                r.offset_end -= leading;
                r
            })
            .collect();

        Some(Paragraph {
            text: trimmed.to_string(),
            refs,
        })
    }
}

fn figure_fragment(element: &Element) -> Option<ContentFragment> {
    if element.attr("type") == Some("table") {
        if let Some(table) = element.find("table") {
            return table_from(table, Some(element)).map(ContentFragment::Table);
        }
    }

    let caption = element.find("figDesc").and_then(Element::collapsed_text);
    if caption.is_none() {
        log::debug!("Figure without caption");
    }

    Some(ContentFragment::Figure(Figure {
        id: element.xml_id().map(str::to_string),
        label: element.child("label").and_then(Element::collapsed_text),
        head: element.child("head").and_then(Element::collapsed_text),
        caption,
    }))
}

/// Build a table; `None` when no row has cells.
fn table_from(table: &Element, figure: Option<&Element>) -> Option<Table> {
    let mut result = Table::new();
    for row in table.find_all("row") {
        let cells: Vec<String> = row
            .find_all("cell")
            .map(|cell| cell.text().trim().to_string())
            .collect();
        result.add_row(cells);
    }

    if result.is_empty() {
        log::debug!("Dropping table without rows");
        return None;
    }

    let outer = figure.unwrap_or(table);
    result.id = outer
        .xml_id()
        .or_else(|| table.xml_id())
        .map(str::to_string);
    result.label = outer.child("label").and_then(Element::collapsed_text);
    result.caption = figure
        .and_then(|f| f.find("figDesc"))
        .and_then(Element::collapsed_text);
    Some(result)
}
