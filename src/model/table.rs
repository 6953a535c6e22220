//! Table types.

use serde::{Deserialize, Serialize};

/// A table as rows of trimmed cell text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// `xml:id` of the table or its enclosing figure
    pub id: Option<String>,

    /// Table label (e.g. "1")
    pub label: Option<String>,

    /// Table caption
    pub caption: Option<String>,

    /// Rows in element order; never contains an empty row
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row; rows without cells are ignored.
    pub fn add_row(&mut self, cells: Vec<String>) {
        if !cells.is_empty() {
            self.rows.push(cells);
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
