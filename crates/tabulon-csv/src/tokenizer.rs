//! Record tokenizer
//!
//! Converts a line-producing source plus a [`ControlSet`] into a lazy,
//! finite sequence of [`Record`]s. Parsing follows the historical lenient
//! semantics rather than strict RFC 4180: a stray enclosure inside an
//! unenclosed field is literal content, bytes between a closing enclosure
//! and the next delimiter are absorbed into the field, and an enclosure
//! left open at end-of-source terminates the field with whatever content
//! accumulated. Every absorbed anomaly is logged, never raised.

use log::{trace, warn};
use tabulon_core::{Field, Record};

use crate::error::CsvResult;
use crate::options::{BlankLinePolicy, ControlSet};
use crate::source::LineSource;

/// Parser state while assembling one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field; the next significant byte decides the kind
    FieldStart,
    /// Inside an unenclosed field
    InUnenclosedField,
    /// Inside an enclosed field (may span physical lines)
    InEnclosedField,
    /// Just past the closing enclosure, expecting delimiter or terminator
    AfterClosingEnclosure,
    /// All fields of the record consumed
    RecordComplete,
}

/// A lazy, pull-based record producer over a [`LineSource`]
///
/// Each pull reads as many physical lines as the current record spans.
/// The sequence is single-pass; restart by rewinding and re-wrapping the
/// source.
pub struct Tokenizer<S> {
    source: S,
    controls: ControlSet,
    blank_lines: BlankLinePolicy,
    exhausted: bool,
}

impl<S: LineSource> Tokenizer<S> {
    /// Create a tokenizer over a line source
    pub fn new(source: S, controls: ControlSet, blank_lines: BlankLinePolicy) -> Self {
        Self {
            source,
            controls,
            blank_lines,
            exhausted: false,
        }
    }

    /// The control set in effect
    pub fn controls(&self) -> ControlSet {
        self.controls
    }

    /// Consume the tokenizer, returning the underlying source
    pub fn into_source(self) -> S {
        self.source
    }

    fn next_record(&mut self) -> CsvResult<Option<Record>> {
        loop {
            let Some(line) = self.source.next_line()? else {
                return Ok(None);
            };
            let record = self.parse_record(line)?;
            if record.is_blank() && self.blank_lines == BlankLinePolicy::Skip {
                continue;
            }
            return Ok(Some(record));
        }
    }

    /// Assemble one record, fetching continuation lines for enclosed fields
    /// whose enclosure is still open at the end of a physical line.
    fn parse_record(&mut self, mut buf: Vec<u8>) -> CsvResult<Record> {
        let ControlSet {
            delimiter,
            enclosure,
            escape,
        } = self.controls;

        if strip_terminator(&buf).is_empty() {
            return Ok(Record::blank());
        }

        let mut fields: Vec<Field> = Vec::new();
        let mut content: Vec<u8> = Vec::new();
        let mut pos = 0usize;
        let mut state = State::FieldStart;

        loop {
            match state {
                State::FieldStart => {
                    // Whitespace that is neither delimiter nor enclosure is
                    // skipped only to detect an enclosure; unenclosed field
                    // content starts at the untrimmed position.
                    let mut probe = pos;
                    while probe < buf.len() && is_detection_whitespace(buf[probe], &self.controls)
                    {
                        probe += 1;
                    }
                    if buf.get(probe) == Some(&enclosure) {
                        pos = probe + 1;
                        content.clear();
                        state = State::InEnclosedField;
                    } else {
                        content.clear();
                        state = State::InUnenclosedField;
                    }
                }

                State::InUnenclosedField => {
                    let start = pos;
                    while pos < buf.len()
                        && buf[pos] != delimiter
                        && buf[pos] != b'\r'
                        && buf[pos] != b'\n'
                    {
                        pos += 1;
                    }
                    let value = &buf[start..pos];
                    if value.contains(&enclosure) {
                        warn!("stray enclosure inside unenclosed field kept as literal content");
                    }
                    fields.push(Some(decode(value)));
                    match buf.get(pos) {
                        Some(&b) if b == delimiter => {
                            pos += 1;
                            state = State::FieldStart;
                        }
                        _ => state = State::RecordComplete,
                    }
                }

                State::InEnclosedField => {
                    if pos >= buf.len() {
                        // enclosure still open at the end of the physical
                        // line: the line break belongs to the field and the
                        // next physical line continues it
                        match self.source.next_line()? {
                            Some(next) => {
                                trace!("enclosed field continues on the next physical line");
                                buf.extend_from_slice(&next);
                            }
                            None => {
                                warn!("enclosure left open at end of source; field terminated");
                                fields.push(Some(decode(&content)));
                                state = State::RecordComplete;
                            }
                        }
                        continue;
                    }
                    let byte = buf[pos];
                    if Some(byte) == escape {
                        if pos + 1 >= buf.len() {
                            // escaped byte may be the first of the next line
                            match self.source.next_line()? {
                                Some(next) => buf.extend_from_slice(&next),
                                None => {
                                    content.push(byte);
                                    pos += 1;
                                }
                            }
                            continue;
                        }
                        content.push(buf[pos + 1]);
                        pos += 2;
                    } else if byte == enclosure {
                        if escape.is_none() && buf.get(pos + 1) == Some(&enclosure) {
                            // doubled enclosure is one literal enclosure byte
                            content.push(enclosure);
                            pos += 2;
                        } else {
                            pos += 1;
                            state = State::AfterClosingEnclosure;
                        }
                    } else {
                        content.push(byte);
                        pos += 1;
                    }
                }

                State::AfterClosingEnclosure => match buf.get(pos) {
                    None => {
                        fields.push(Some(decode(&content)));
                        state = State::RecordComplete;
                    }
                    Some(&b) if b == delimiter => {
                        fields.push(Some(decode(&content)));
                        pos += 1;
                        state = State::FieldStart;
                    }
                    Some(&b'\r') | Some(&b'\n') => {
                        fields.push(Some(decode(&content)));
                        state = State::RecordComplete;
                    }
                    Some(&b) => {
                        // legacy leniency: bytes between the closing
                        // enclosure and the delimiter join the field
                        trace!("content after closing enclosure absorbed into field");
                        content.push(b);
                        pos += 1;
                    }
                },

                State::RecordComplete => return Ok(Record::new(fields)),
            }
        }
    }
}

impl<S: LineSource> Iterator for Tokenizer<S> {
    type Item = CsvResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(err) => {
                // IO failure is not retried; the sequence ends here
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}

/// The fixed whitespace set trimmed before field-start detection
fn is_detection_whitespace(byte: u8, controls: &ControlSet) -> bool {
    (byte == b' ' || byte == b'\t') && byte != controls.delimiter && byte != controls.enclosure
}

/// A line body without its terminator bytes
fn strip_terminator(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && (line[end - 1] == b'\n' || line[end - 1] == b'\r') {
        end -= 1;
    }
    &line[..end]
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
