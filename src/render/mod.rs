//! Rendering module for converting documents to output formats.
//!
//! All renderers are pure functions over a [`Document`](crate::model::Document).

mod json;
mod markdown;
mod options;
mod record;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
pub use record::{
    to_record, AuthorEntry, Biblio, BodyEntry, FigureEntry, Record, RefEntry, ReferenceEntry,
};
pub use text::to_text;
