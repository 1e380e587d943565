//! Parser for the TrueType font container format

pub use data_source::{DataSource, FileSource, MemorySource};
pub use data_types::TableTag;
pub use error::{FontResult, ParseError};
pub use font::{TableSlot, TableState, TrueTypeFont};
pub use parser::FontParser;

mod data_source;
pub mod data_types;
mod error;
mod font;
mod parser;
pub mod table;
