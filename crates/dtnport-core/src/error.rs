//! Error types and results.

use std::{fmt, io};

/// Convenience alias for results produced by this workspace.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Errors that the primitives layer can signal to callers.
///
/// All of these are locally recoverable; none of them aborts the process.
#[derive(Debug)]
pub enum ErrorKind {
    /// An SDNV ran past its 10-byte bound without a terminating byte.
    MalformedSdnv,
    /// A scalar division was attempted with a zero divisor.
    DivideByZero,
    /// The input ended before a complete value could be decoded.
    IoError(io::Error),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedSdnv => {
                write!(f, "SDNV exceeds 10 bytes without a terminating byte")
            }
            ErrorKind::DivideByZero => write!(f, "scalar division by zero"),
            ErrorKind::IoError(e) => write!(f, "input ended prematurely: {}", e),
        }
    }
}

impl std::error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ErrorKind::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(e: io::Error) -> Self {
        ErrorKind::IoError(e)
    }
}
