//! Codec error types.

use std::error;
use std::fmt;
use std::io;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors produced while reading or writing a baseline JPEG.
#[derive(Debug)]
pub enum CodecError {
    /// Underlying file or stream I/O failed.
    Io(io::Error),
    /// The byte stream violates the baseline JPEG grammar.
    Malformed(&'static str),
    /// The file is valid JPEG but uses a feature outside the baseline
    /// sequential subset this codec handles.
    Unsupported(&'static str),
    /// A coefficient requires a Huffman code the file's tables do not
    /// define. Recoverable by re-encoding with the typical tables.
    MissingCode {
        /// Table class: 0 for DC, 1 for AC.
        class: u8,
        /// The run/size (AC) or category (DC) symbol that has no code.
        symbol: u8,
    },
}

/// Convenience alias for codec results.
pub type Result<T> = std::result::Result<T, CodecError>;

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Malformed(what) => write!(f, "malformed jpeg: {what}"),
            Self::Unsupported(what) => write!(f, "unsupported jpeg: {what}"),
            Self::MissingCode { class, symbol } => {
                let kind = if *class == 0 { "dc" } else { "ac" };
                write!(f, "huffman table defines no code for {kind} symbol {symbol:#04x}")
            }
        }
    }
}

impl error::Error for CodecError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
