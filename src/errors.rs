//! Definition of errors.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors in fastoil.
#[derive(Debug)]
pub enum FastOilError {
    /// Contains [`InvalidArgumentError`].
    InvalidArgument(InvalidArgumentError),

    /// Contains [`InvalidFormatError`].
    InvalidFormat(InvalidFormatError),

    /// Contains [`ConflictingSampleError`].
    ConflictingSample(ConflictingSampleError),

    /// Contains [`std::io::Error`].
    Io(io::Error),
}

impl FastOilError {
    pub(crate) fn invalid_argument<T>(arg: &'static str, op: &'static str, value: T) -> Self
    where
        T: fmt::Display,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: format!("must be {op} {value}"),
        })
    }

    pub(crate) fn invalid_format<M>(line: usize, msg: M) -> Self
    where
        M: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            line,
            msg: msg.into(),
        })
    }

    pub(crate) const fn conflicting_sample(sample: Vec<u32>) -> Self {
        Self::ConflictingSample(ConflictingSampleError { sample })
    }
}

impl fmt::Display for FastOilError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::ConflictingSample(e) => e.fmt(f),
            Self::Io(e) => write!(f, "IoError: {e}"),
        }
    }
}

impl Error for FastOilError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FastOilError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a sample file or a model file is malformed.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// 1-based line number of the offending line.
    pub(crate) line: usize,

    /// Error message.
    pub(crate) msg: String,
}

impl InvalidFormatError {
    /// Line on which the error was detected.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: line {}: {}", self.line, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when the same sequence is labeled both positive and negative.
#[derive(Debug)]
pub struct ConflictingSampleError {
    /// The sequence found in both sets.
    pub(crate) sample: Vec<u32>,
}

impl ConflictingSampleError {
    /// The sequence found in both sets.
    #[must_use]
    pub fn sample(&self) -> &[u32] {
        &self.sample
    }
}

impl fmt::Display for ConflictingSampleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConflictingSampleError: {:?}", self.sample)
    }
}

impl Error for ConflictingSampleError {}

/// A specialized Result type for fastoil.
pub type Result<T, E = FastOilError> = core::result::Result<T, E>;
