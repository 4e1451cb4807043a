//! CSV writer
//!
//! Re-encodes records as delimited text with minimal quoting: a field is
//! enclosed only when it contains the delimiter, the enclosure, or a line
//! break. Enclosure bytes inside an enclosed field are doubled, or prefixed
//! with the escape byte when the control set configures one. Parsing a
//! written document yields the original records back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabulon_core::Record;

use crate::error::CsvResult;
use crate::options::WriteOptions;

/// A record writer
pub struct Writer<W> {
    inner: W,
    options: WriteOptions,
}

impl Writer<BufWriter<File>> {
    /// Create a file and write records to it
    pub fn from_path<P: AsRef<Path>>(path: P, options: WriteOptions) -> CsvResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), options))
    }
}

impl<W: Write> Writer<W> {
    /// Wrap a writer
    pub fn new(inner: W, options: WriteOptions) -> Self {
        Self { inner, options }
    }

    /// Write one record followed by the configured line terminator
    ///
    /// Null fields encode as empty fields; the blank-line sentinel encodes
    /// as an empty line.
    pub fn write_record(&mut self, record: &Record) -> CsvResult<()> {
        let delimiter = self.options.controls.delimiter;
        if !record.is_blank() {
            let mut first = true;
            for field in record {
                if !first {
                    self.inner.write_all(&[delimiter])?;
                }
                first = false;
                if let Some(value) = field {
                    let encoded = self.encode_field(value);
                    self.inner.write_all(&encoded)?;
                }
            }
        }
        self.inner
            .write_all(self.options.line_terminator.as_bytes())?;
        Ok(())
    }

    /// Write every record of a sequence
    pub fn write_all<'a, I>(&mut self, records: I) -> CsvResult<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> CsvResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consume the writer, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn encode_field(&self, value: &str) -> Vec<u8> {
        let controls = self.options.controls;
        let bytes = value.as_bytes();
        let needs_enclosure = bytes.iter().any(|&b| {
            b == controls.delimiter
                || b == controls.enclosure
                || b == b'\r'
                || b == b'\n'
                || Some(b) == controls.escape
        });
        if !needs_enclosure {
            return bytes.to_vec();
        }

        let mut encoded = Vec::with_capacity(bytes.len() + 2);
        encoded.push(controls.enclosure);
        for &b in bytes {
            if b == controls.enclosure || Some(b) == controls.escape {
                match controls.escape {
                    Some(escape) => encoded.push(escape),
                    None => encoded.push(controls.enclosure),
                }
            }
            encoded.push(b);
        }
        encoded.push(controls.enclosure);
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ControlSet, LineTerminator};

    fn write_one(record: &Record, options: WriteOptions) -> String {
        let mut writer = Writer::new(Vec::new(), options);
        writer.write_record(record).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_fields_unquoted() {
        let out = write_one(&Record::from_iter(["a", "b"]), WriteOptions::default());
        assert_eq!(out, "a,b\n");
    }

    #[test]
    fn test_quoting_and_doubling() {
        let out = write_one(
            &Record::from_iter(["a,b", "say \"hi\"", "multi\nline"]),
            WriteOptions::default(),
        );
        assert_eq!(out, "\"a,b\",\"say \"\"hi\"\"\",\"multi\nline\"\n");
    }

    #[test]
    fn test_null_field_is_empty() {
        let out = write_one(
            &Record::new(vec![Some("a".to_string()), None]),
            WriteOptions::default(),
        );
        assert_eq!(out, "a,\n");
    }

    #[test]
    fn test_blank_sentinel_is_empty_line() {
        let out = write_one(&Record::blank(), WriteOptions::default());
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_escape_byte_encoding() {
        let options = WriteOptions {
            controls: ControlSet::new(b',', b'"', Some(b'\\')).unwrap(),
            line_terminator: LineTerminator::LF,
        };
        let out = write_one(&Record::from_iter(["a\"b"]), options);
        assert_eq!(out, "\"a\\\"b\"\n");
    }

    #[test]
    fn test_crlf_terminator() {
        let options = WriteOptions {
            controls: ControlSet::default(),
            line_terminator: LineTerminator::CRLF,
        };
        let out = write_one(&Record::from_iter(["a"]), options);
        assert_eq!(out, "a\r\n");
    }
}
