//! Parsing options and configuration.

/// Default long-form layout for publication dates ("March 08, 2016").
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

/// Options for parsing TEI documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Root element handling
    pub error_mode: ErrorMode,

    /// What to extract from the document
    pub extract_mode: ExtractMode,

    /// `chrono` format string for full publication dates
    pub date_format: String,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (accept a `teiCorpus` wrapper).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set extract mode.
    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.extract_mode = mode;
        self
    }

    /// Extract header metadata only.
    pub fn header_only(mut self) -> Self {
        self.extract_mode = ExtractMode::HeaderOnly;
        self
    }

    /// Set the format used for full publication dates.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            extract_mode: ExtractMode::Full,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Root element handling during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Require a `TEI` root element
    #[default]
    Strict,
    /// Also accept a `teiCorpus` root and use its first `TEI` document
    Lenient,
}

/// What content to extract from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Extract header, body, back matter and bibliography
    #[default]
    Full,
    /// Extract header metadata only
    HeaderOnly,
}
