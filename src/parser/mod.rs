//! TEI parsing module.

mod bibliography;
mod content;
mod metadata;
mod options;
mod sections;
mod tei_parser;
mod zones;

pub use content::Normalizer;
pub use metadata::Metadata;
pub use options::{ErrorMode, ExtractMode, ParseOptions, DEFAULT_DATE_FORMAT};
pub use tei_parser::TeiParser;
pub use zones::Zones;
