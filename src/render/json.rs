//! JSON rendering of the structured record.

use crate::error::{Error, Result};
use crate::model::Document;

use super::record::to_record;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document's structured record to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let record = to_record(doc);
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&record),
        JsonFormat::Compact => serde_json::to_string(&record),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
