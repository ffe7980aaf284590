use std::array::TryFromSliceError;
use std::fmt;
use std::io;

/// Error is the crate-wide error type returned by every fallible
/// pager, codec and tree operation.
#[derive(Debug)]
pub enum Error {
    /// Wraps an I/O failure encountered while opening, seeking,
    /// reading, writing or appending to the index file.
    Io(io::Error),
    /// A fixed-size byte slice could not be converted to its
    /// expected array size; indicates a truncated or corrupt page.
    TryFromSliceError(TryFromSliceError),
    /// A child offset of -1 was followed during descent, a node of the
    /// wrong kind was found where a leaf or internal node was expected,
    /// or some other structural invariant was violated.
    UnexpectedError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::TryFromSliceError(err) => write!(f, "corrupt page: {}", err),
            Error::UnexpectedError => write!(f, "unexpected error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::TryFromSliceError(err) => Some(err),
            Error::UnexpectedError => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<TryFromSliceError> for Error {
    fn from(err: TryFromSliceError) -> Error {
        Error::TryFromSliceError(err)
    }
}
