//! CSV options

use crate::error::{CsvError, CsvResult};

/// The control characters driving the tokenizer
///
/// Each control is exactly one byte. When `escape` is `None` the tokenizer
/// uses the enclosure-doubling convention (`""` inside an enclosed field is
/// a literal enclosure character) instead of escape-based quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlSet {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Enclosure character marking fields that may contain the delimiter or
    /// line breaks (default: double quote)
    pub enclosure: u8,
    /// Optional escape byte; `None` selects the doubling convention
    pub escape: Option<u8>,
}

impl ControlSet {
    /// Create a validated control set
    ///
    /// # Errors
    ///
    /// [`CsvError::InvalidControls`] when the delimiter equals the
    /// enclosure, or the escape byte collides with either.
    pub fn new(delimiter: u8, enclosure: u8, escape: Option<u8>) -> CsvResult<Self> {
        if delimiter == enclosure {
            return Err(CsvError::InvalidControls(
                "delimiter and enclosure must differ".to_string(),
            ));
        }
        if let Some(escape) = escape {
            if escape == delimiter || escape == enclosure {
                return Err(CsvError::InvalidControls(
                    "escape must differ from delimiter and enclosure".to_string(),
                ));
            }
        }
        Ok(Self {
            delimiter,
            enclosure,
            escape,
        })
    }
}

impl Default for ControlSet {
    fn default() -> Self {
        Self {
            delimiter: b',',
            enclosure: b'"',
            escape: None,
        }
    }
}

/// What to do with a genuinely empty physical line (the single-null-field
/// sentinel record)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankLinePolicy {
    /// Drop blank records from the output sequence
    #[default]
    Skip,
    /// Yield blank records as the single-null-field sentinel
    Keep,
}

/// Options for reading delimited text
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Control characters
    pub controls: ControlSet,
    /// Blank-line handling
    pub blank_lines: BlankLinePolicy,
    /// Whether the first record is a header to bind to every data record
    pub has_header: bool,
}

/// Options for writing delimited text
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Control characters
    pub controls: ControlSet,
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            controls: ControlSet::default(),
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
    /// Mac classic (CR)
    CR,
}

impl LineTerminator {
    /// The terminator bytes
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineTerminator::LF => b"\n",
            LineTerminator::CRLF => b"\r\n",
            LineTerminator::CR => b"\r",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_set_rejects_collisions() {
        assert!(ControlSet::new(b',', b',', None).is_err());
        assert!(ControlSet::new(b',', b'"', Some(b',')).is_err());
        assert!(ControlSet::new(b',', b'"', Some(b'"')).is_err());
        assert!(ControlSet::new(b';', b'\'', Some(b'\\')).is_ok());
    }
}
