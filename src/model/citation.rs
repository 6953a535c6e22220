//! Bibliography citation records.

use serde::{Deserialize, Serialize};

/// A normalized bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based position in the bibliography list
    pub ordinal: u32,

    /// Article-level title
    pub title: Option<String>,

    /// Assembled author names, in entry order
    pub authors: Vec<String>,

    /// Journal or monograph title
    pub venue: Option<String>,

    /// Date as written in the entry, not normalized
    pub date: Option<String>,
}

impl Citation {
    /// Create an empty citation occupying the given ordinal.
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            title: None,
            authors: Vec::new(),
            venue: None,
            date: None,
        }
    }

    /// An entry with no title, no authors and no venue.
    ///
    /// Empty entries keep their ordinal but are not rendered as text.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.authors.is_empty() && self.venue.is_none()
    }

    /// Short author summary: "A", "A and B", or "A et al.".
    pub fn author_summary(&self) -> Option<String> {
        match self.authors.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            [first, second] => Some(format!("{} and {}", first, second)),
            [first, ..] => Some(format!("{} et al.", first)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_authors(names: &[&str]) -> Citation {
        let mut c = Citation::new(1);
        c.authors = names.iter().map(|s| s.to_string()).collect();
        c
    }

    #[test]
    fn test_author_summary() {
        assert_eq!(with_authors(&[]).author_summary(), None);
        assert_eq!(
            with_authors(&["Ada Lovelace"]).author_summary().as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(
            with_authors(&["A", "B"]).author_summary().as_deref(),
            Some("A and B")
        );
        assert_eq!(
            with_authors(&["A", "B", "C"]).author_summary().as_deref(),
            Some("A et al.")
        );
    }

    #[test]
    fn test_empty_citation() {
        let mut c = Citation::new(3);
        c.date = Some("2001".to_string());
        assert!(c.is_empty());
        c.venue = Some("Nature".to_string());
        assert!(!c.is_empty());
    }
}
