//! Rendering options and configuration.

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with header metadata
    pub include_frontmatter: bool,

    /// Render the abstract before the body
    pub include_abstract: bool,

    /// Render back-matter content
    pub include_annex: bool,

    /// Render the references section
    pub include_references: bool,

    /// Emit a header separator after the first table row
    pub table_header: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the abstract.
    pub fn with_abstract(mut self, include: bool) -> Self {
        self.include_abstract = include;
        self
    }

    /// Enable or disable back-matter content.
    pub fn with_annex(mut self, include: bool) -> Self {
        self.include_annex = include;
        self
    }

    /// Enable or disable the references section.
    pub fn with_references(mut self, include: bool) -> Self {
        self.include_references = include;
        self
    }

    /// Enable or disable the table header separator.
    pub fn with_table_header(mut self, header: bool) -> Self {
        self.table_header = header;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            include_abstract: false,
            include_annex: true,
            include_references: true,
            table_header: true,
        }
    }
}
