//! # tabulon-csv
//!
//! Delimited-text tokenizer, reader and writer for tabulon.
//!
//! The tokenizer reproduces historical delimited-text parsing semantics
//! (enclosure doubling, multi-line enclosed fields, permissive handling of
//! malformed input) over any [`LineSource`], without delegating to a CSV
//! library.

mod error;
mod options;
mod reader;
mod source;
mod tokenizer;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{BlankLinePolicy, ControlSet, LineTerminator, ReadOptions, WriteOptions};
pub use reader::Reader;
pub use source::{LineSource, Lines, SeekableLines};
pub use tokenizer::Tokenizer;
pub use writer::Writer;
