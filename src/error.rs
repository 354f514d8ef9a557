use std::fmt;

/// Error generating an identifier.
#[derive(Debug)]
pub enum Error {
    /// A plain random ID of zero length was requested.
    InvalidLength,

    /// The random segment could not be incremented because all 62^8 values were used up within a
    /// single millisecond.
    Overflow,

    /// The secure random number source failed.
    RandSource(rand::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength => write!(f, "identifier length must be positive"),
            Self::Overflow => write!(f, "same-millisecond capacity exhausted"),
            Self::RandSource(err) => write!(f, "random number source failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RandSource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rand::Error> for Error {
    fn from(src: rand::Error) -> Self {
        Self::RandSource(src)
    }
}

impl From<crate::base62::Overflow> for Error {
    fn from(_: crate::base62::Overflow) -> Self {
        Self::Overflow
    }
}
