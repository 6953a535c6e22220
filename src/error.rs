//! Error types for untei library.

use std::io;
use thiserror::Error;

/// Result type alias for untei operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during TEI processing.
///
/// Only failures to load a tree are errors. A zone or field that is missing
/// from an otherwise well-formed document is represented as an absent value
/// in the [`Document`](crate::Document), never as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files or streams.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The markup is not well-formed XML.
    #[error("XML parsing error: {message}")]
    Parse {
        /// Description from the XML reader
        message: String,
        /// Byte offset where the error was detected
        position: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The root element is not a TEI document.
    #[error("Missing TEI root element (found <{0}>)")]
    MissingRoot(String),

    /// Error during serialization of the structured record.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Create a parse error without position information.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
            position: None,
        }
    }

    /// Whether the error came from the markup itself rather than I/O.
    pub fn is_markup_error(&self) -> bool {
        matches!(
            self,
            Error::Parse { .. } | Error::Encoding(_) | Error::MissingRoot(_)
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::parse(err.to_string()),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
