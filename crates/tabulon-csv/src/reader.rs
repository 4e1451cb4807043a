//! CSV reader
//!
//! A convenience layer over the tokenizer that resolves the first record as
//! a column-name header and binds it to every data record, so the query
//! layer can address columns by name.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::Arc;

use tabulon_core::Record;

use crate::error::CsvResult;
use crate::options::ReadOptions;
use crate::source::{LineSource, SeekableLines};
use crate::tokenizer::Tokenizer;

/// A record reader with optional header binding
pub struct Reader<S> {
    tokenizer: Tokenizer<S>,
    has_header: bool,
    header: Option<Arc<[String]>>,
    header_read: bool,
}

impl Reader<SeekableLines<BufReader<File>>> {
    /// Open a file as a record reader
    pub fn from_path<P: AsRef<Path>>(path: P, options: ReadOptions) -> CsvResult<Self> {
        let file = File::open(path)?;
        Ok(Self::from_source(
            SeekableLines::new(BufReader::new(file)),
            options,
        ))
    }
}

impl Reader<SeekableLines<Cursor<Vec<u8>>>> {
    /// Read records from an in-memory document
    pub fn from_string<T: Into<Vec<u8>>>(document: T, options: ReadOptions) -> Self {
        Self::from_source(SeekableLines::new(Cursor::new(document.into())), options)
    }
}

impl<S: LineSource> Reader<S> {
    /// Wrap a line source as a record reader
    pub fn from_source(source: S, options: ReadOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(source, options.controls, options.blank_lines),
            has_header: options.has_header,
            header: None,
            header_read: false,
        }
    }

    /// The header resolved from the first record, when configured
    ///
    /// Null fields in the header record map to empty names. Reading the
    /// header consumes the first record from the source.
    pub fn headers(&mut self) -> CsvResult<Option<&[String]>> {
        self.read_header()?;
        Ok(self.header.as_deref())
    }

    fn read_header(&mut self) -> CsvResult<()> {
        if self.header_read || !self.has_header {
            self.header_read = true;
            return Ok(());
        }
        self.header_read = true;
        if let Some(record) = self.tokenizer.next().transpose()? {
            let names: Arc<[String]> = record
                .into_fields()
                .into_iter()
                .map(|f| f.unwrap_or_default())
                .collect();
            self.header = Some(names);
        }
        Ok(())
    }
}

impl<S: LineSource> Iterator for Reader<S> {
    type Item = CsvResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.read_header() {
            return Some(Err(err));
        }
        let record = match self.tokenizer.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err)),
        };
        Some(Ok(match &self.header {
            Some(header) => record.with_header(Arc::clone(header)),
            None => record,
        }))
    }
}
