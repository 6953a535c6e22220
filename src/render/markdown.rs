//! Markdown rendering for TEI documents.

use crate::model::{Citation, ContentFragment, Document, Figure, Formula, Table};

use super::RenderOptions;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> String {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.to_yaml_frontmatter());
            output.push('\n');
        }

        self.render_header(&mut output, doc);

        if self.options.include_abstract && !doc.abstract_fragments.is_empty() {
            output.push_str("## Abstract\n");
            for fragment in &doc.abstract_fragments {
                self.render_fragment(&mut output, fragment);
            }
        }

        let mut body = String::new();
        for section in &doc.sections {
            if let Some(ref heading) = section.heading {
                body.push_str(&format!("### {}\n", heading));
            }
            for fragment in &section.fragments {
                self.render_fragment(&mut body, fragment);
            }
        }
        if !body.is_empty() {
            output.push_str(&body);
            output.push('\n');
        }

        if self.options.include_annex {
            let mut annex = String::new();
            for fragment in &doc.annex {
                self.render_fragment(&mut annex, fragment);
            }
            if !annex.is_empty() {
                output.push_str(&annex);
                output.push('\n');
            }
        }

        if self.options.include_references {
            let lines: Vec<String> = doc
                .bibliography
                .iter()
                .filter_map(format_citation)
                .collect();
            if !lines.is_empty() {
                output.push_str("## References\n");
                output.push_str(&lines.join("\n"));
                output.push('\n');
            }
        }

        output
    }

    fn render_header(&self, output: &mut String, doc: &Document) {
        if let Some(ref title) = doc.title {
            output.push_str(&format!("# {}\n", title));
        }

        if !doc.authors.is_empty() {
            for author in &doc.authors {
                output.push_str(&author.name);
                output.push('\n');
            }
            output.push('\n');
        }

        if !doc.affiliations.is_empty() {
            output.push_str(&doc.affiliations.join(", "));
            output.push_str("\n\n");
        }

        if let Some(ref date) = doc.publication_date {
            output.push_str(&format!("Published on {}\n\n", date.formatted));
        }
    }

    fn render_fragment(&self, output: &mut String, fragment: &ContentFragment) {
        match fragment {
            ContentFragment::Paragraph(p) => {
                if !p.is_empty() {
                    output.push_str(&p.text);
                    output.push_str("\n\n");
                }
            }
            ContentFragment::Figure(f) => render_figure(output, f),
            ContentFragment::Table(t) => self.render_table(output, t),
            ContentFragment::Formula(f) => render_formula(output, f),
        }
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }

        if let Some(ref caption) = table.caption {
            output.push_str(&format!("*Table: {}*\n\n", caption));
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for cell in row {
                output.push_str(&format!(" {} |", escape_cell(cell)));
            }
            output.push('\n');

            if i == 0 && self.options.table_header {
                output.push('|');
                for _ in row {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }

        output.push('\n');
    }
}

fn render_figure(output: &mut String, figure: &Figure) {
    if let Some(ref caption) = figure.caption {
        output.push_str(&format!("*Figure: {}*\n\n", caption));
    }
}

/// Labelled formulas become fenced blocks, unlabelled ones inline code.
fn render_formula(output: &mut String, formula: &Formula) {
    match formula.label {
        Some(ref label) if formula.text.is_empty() => {
            output.push_str(&format!("```\n{}\n```\n\n", label));
        }
        Some(ref label) => {
            output.push_str(&format!("```\n{} {}\n```\n\n", formula.text, label));
        }
        None if formula.text.is_empty() => {}
        None => output.push_str(&format!("`{}`\n\n", formula.text)),
    }
}

/// Format one reference line; `None` for entries with nothing to show.
fn format_citation(citation: &Citation) -> Option<String> {
    if citation.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    if let Some(ref title) = citation.title {
        parts.push(title.clone());
    }
    if let Some(authors) = citation.author_summary() {
        parts.push(format!("*{}*", authors));
    }
    if let Some(ref venue) = citation.venue {
        parts.push(format!("*{}*", venue));
    }
    if let Some(ref date) = citation.date {
        parts.push(format!("({})", date));
    }

    Some(format!("**[{}]** {}.", citation.ordinal, parts.join(". ")))
}

/// Keep a cell on one line and out of the column syntax.
fn escape_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Paragraph, PublicationDate, Section};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.title = Some("Sample Document Title".to_string());
        doc.authors = vec![
            Author {
                name: "A B".to_string(),
            },
            Author {
                name: "C D".to_string(),
            },
        ];
        doc.affiliations = vec!["Uni X".to_string(), "Lab Y".to_string()];
        doc.publication_date = Some(PublicationDate {
            raw: "2016-03-08".to_string(),
            formatted: "March 08, 2016".to_string(),
        });

        let mut intro = Section::new(Some("Introduction".to_string()));
        intro
            .fragments
            .push(ContentFragment::Paragraph(Paragraph::with_text("A sample [1].")));
        doc.sections.push(intro);

        doc.annex
            .push(ContentFragment::Paragraph(Paragraph::with_text("Thanks.")));

        let mut citation = Citation::new(1);
        citation.title = Some("Cited".to_string());
        citation.authors = vec!["E F".to_string(), "G H".to_string()];
        citation.venue = Some("Nature".to_string());
        citation.date = Some("2015".to_string());
        doc.bibliography.push(citation);
        doc
    }

    #[test]
    fn test_render_layout() {
        let md = to_markdown(&sample(), &RenderOptions::default());
        assert_eq!(
            md,
            "# Sample Document Title\n\
             A B\n\
             C D\n\
             \n\
             Uni X, Lab Y\n\
             \n\
             Published on March 08, 2016\n\
             \n\
             ### Introduction\n\
             A sample [1].\n\
             \n\
             \n\
             Thanks.\n\
             \n\
             \n\
             ## References\n\
             **[1]** Cited. *E F and G H*. *Nature*. (2015).\n"
        );
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(to_markdown(&Document::new(), &RenderOptions::default()), "");
    }

    #[test]
    fn test_render_toggles() {
        let options = RenderOptions::new().with_annex(false).with_references(false);
        let md = to_markdown(&sample(), &options);
        assert!(!md.contains("Thanks."));
        assert!(!md.contains("## References"));
    }

    #[test]
    fn test_render_with_frontmatter() {
        let options = RenderOptions::new().with_frontmatter(true);
        let md = to_markdown(&sample(), &options);
        assert!(md.starts_with("---\n"));
        assert!(md.contains("title: \"Sample Document Title\""));
    }

    #[test]
    fn test_render_abstract() {
        let mut doc = sample();
        doc.abstract_fragments
            .push(ContentFragment::Paragraph(Paragraph::with_text("We study X.")));

        let hidden = to_markdown(&doc, &RenderOptions::default());
        assert!(!hidden.contains("We study X."));

        let shown = to_markdown(&doc, &RenderOptions::new().with_abstract(true));
        assert!(shown.contains("## Abstract\nWe study X.\n\n"));
    }

    #[test]
    fn test_render_formulas() {
        let mut out = String::new();
        render_formula(
            &mut out,
            &Formula {
                text: "E = mc^2".to_string(),
                label: Some("(1)".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(out, "```\nE = mc^2 (1)\n```\n\n");

        let mut out = String::new();
        render_formula(
            &mut out,
            &Formula {
                text: "x + y".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(out, "`x + y`\n\n");

        let mut out = String::new();
        render_formula(&mut out, &Formula::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_render_table() {
        let mut table = Table::new();
        table.caption = Some("Scores".to_string());
        table.add_row(vec!["a".to_string(), "b|c".to_string()]);
        table.add_row(vec!["1".to_string(), "2".to_string()]);

        let mut out = String::new();
        MarkdownRenderer::new(RenderOptions::default()).render_table(&mut out, &table);
        assert_eq!(
            out,
            "*Table: Scores*\n\n| a | b\\|c |\n| --- | --- |\n| 1 | 2 |\n\n"
        );

        let mut out = String::new();
        MarkdownRenderer::new(RenderOptions::new().with_table_header(false))
            .render_table(&mut out, &table);
        assert!(!out.contains("---"));
    }

    #[test]
    fn test_figure_without_caption_is_skipped() {
        let mut out = String::new();
        render_figure(&mut out, &Figure::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_format_citation() {
        let mut citation = Citation::new(4);
        assert_eq!(format_citation(&citation), None);

        citation.authors = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(
            format_citation(&citation).as_deref(),
            Some("**[4]** *A et al.*.")
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let doc = sample();
        let options = RenderOptions::default();
        assert_eq!(to_markdown(&doc, &options), to_markdown(&doc, &options));
    }
}
