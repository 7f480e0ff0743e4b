// src/rows/mod.rs
//! Row shaping for the CSV pathway: tokenize → skip → header → name → stream.

pub mod header;
pub mod record;
pub mod skip;
pub mod stream;
pub mod tokenize;

pub use header::{HeaderSource, HeaderSpec};
pub use record::{auto_name, FieldNamer, Record};
pub use skip::{skip_rows, SkipRows};
pub use stream::{RecordStream, Records};
pub use tokenize::tokenize;

/// One tokenized line of cells, before any naming.
pub type RawRow = Vec<String>;
