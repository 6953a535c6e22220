//! Document model types for TEI content representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! TEI extraction and content rendering. A [`Document`] is built once per
//! input tree and is not mutated by the renderers.

mod citation;
mod document;
mod fragment;
mod paragraph;
mod table;

pub use citation::Citation;
pub use document::{Author, Document, DocumentStats, PublicationDate, Section};
pub use fragment::{ContentFragment, Coordinate, Figure, Formula};
pub use paragraph::{InlineRef, Paragraph};
pub use table::Table;
