//! Line-producing sources
//!
//! The tokenizer pulls physical lines through the [`LineSource`] trait, the
//! boundary behind which file opening, BOM stripping and transcoding live.
//! Lines are returned with their terminator bytes intact, because an
//! enclosed field that continues across physical lines must preserve the
//! embedded line break verbatim.

use std::io::{self, BufRead, Seek, SeekFrom};

use crate::error::{CsvError, CsvResult};

/// A pull-based producer of physical lines
///
/// A physical line is terminated by `\r\n`, `\n`, `\r` or end-of-stream,
/// and is returned including its terminator. Each pull may perform blocking
/// IO; it is the only suspension point of the engine.
pub trait LineSource {
    /// Produce the next physical line, or `None` at end-of-stream
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Reset the source to its first line
    fn rewind(&mut self) -> CsvResult<()>;

    /// Whether [`rewind`](Self::rewind) is supported
    fn is_seekable(&self) -> bool;
}

/// Scan one physical line, terminator included, from a buffered reader
///
/// Recognizes `\n`, `\r` and `\r\n`, including a CRLF pair split across two
/// buffer refills.
fn read_physical_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(if line.is_empty() { None } else { Some(line) });
        }
        match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(at) => {
                let terminator = buf[at];
                line.extend_from_slice(&buf[..=at]);
                reader.consume(at + 1);
                if terminator == b'\r' {
                    // the LF of a CRLF pair may sit in the next buffer fill
                    let buf = reader.fill_buf()?;
                    if buf.first() == Some(&b'\n') {
                        line.push(b'\n');
                        reader.consume(1);
                    }
                }
                return Ok(Some(line));
            }
            None => {
                let len = buf.len();
                line.extend_from_slice(buf);
                reader.consume(len);
            }
        }
    }
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        (**self).next_line()
    }

    fn rewind(&mut self) -> CsvResult<()> {
        (**self).rewind()
    }

    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }
}

/// A non-seekable line source over any buffered reader
///
/// Suitable for pipes and sockets; [`LineSource::rewind`] fails. Use
/// [`SeekableLines`] for files and in-memory buffers.
pub struct Lines<R> {
    inner: R,
}

impl<R: BufRead> Lines<R> {
    /// Wrap a buffered reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineSource for Lines<R> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        read_physical_line(&mut self.inner)
    }

    fn rewind(&mut self) -> CsvResult<()> {
        Err(CsvError::UnsupportedRewind)
    }

    fn is_seekable(&self) -> bool {
        false
    }
}

/// A seekable line source over a buffered reader that supports seeking
pub struct SeekableLines<R> {
    inner: R,
}

impl<R: BufRead + Seek> SeekableLines<R> {
    /// Wrap a buffered, seekable reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead + Seek> LineSource for SeekableLines<R> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        read_physical_line(&mut self.inner)
    }

    fn rewind(&mut self) -> CsvResult<()> {
        self.inner.seek(SeekFrom::Start(0)).map_err(CsvError::Io)?;
        Ok(())
    }

    fn is_seekable(&self) -> bool {
        true
    }
}
