use std::{fmt, str};

use fstr::FStr;

use crate::base62;

/// The number of symbols in the timestamp segment.
pub const TIMESTAMP_LEN: usize = 8;

/// The number of symbols in the random segment.
pub const SEGMENT_LEN: usize = 8;

/// The total number of symbols in a sortable identifier.
pub const ID_LEN: usize = TIMESTAMP_LEN + SEGMENT_LEN;

/// Represents a time-sortable identifier: an eight-symbol base-62 millisecond timestamp followed
/// by an eight-symbol random segment.
///
/// The derived ordering compares the underlying ASCII bytes and therefore agrees with the
/// lexicographic order of the string representation.
///
/// # Examples
///
/// ```rust
/// use id62::SortableId;
///
/// let x = "0M1WO4jL38b38b38".parse::<SortableId>()?;
/// assert_eq!(x.timestamp_segment(), "0M1WO4jL");
/// assert_eq!(x.random_segment(), "38b38b38");
/// assert_eq!(x.unix_ts_ms(), 0x0123_4567_89ab);
/// # Ok::<(), id62::ParseError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortableId([u8; ID_LEN]);

impl SortableId {
    /// The smallest identifier ("0000000000000000").
    pub const MIN: Self = Self([base62::ZERO; ID_LEN]);

    /// The largest identifier ("zzzzzzzzzzzzzzzz").
    pub const MAX: Self = Self([base62::MAX_DIGIT; ID_LEN]);

    pub(crate) fn from_parts(timestamp: [u8; TIMESTAMP_LEN], segment: [u8; SEGMENT_LEN]) -> Self {
        let mut dst = [0u8; ID_LEN];
        dst[..TIMESTAMP_LEN].copy_from_slice(&timestamp);
        dst[TIMESTAMP_LEN..].copy_from_slice(&segment);
        Self(dst)
    }

    /// Returns a reference to the underlying ASCII byte array.
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Returns the 16-symbol string representation.
    pub fn as_str(&self) -> &str {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }

    /// Returns the string representation stored in a stack-allocated fixed-length string.
    pub fn encode(&self) -> FStr<ID_LEN> {
        debug_assert!(self.0.is_ascii());
        unsafe { FStr::from_bytes_unchecked(self.0) }
    }

    /// Returns the leading eight symbols that encode the timestamp.
    pub fn timestamp_segment(&self) -> &str {
        &self.as_str()[..TIMESTAMP_LEN]
    }

    /// Returns the trailing eight symbols that carry the random or incremented segment.
    pub fn random_segment(&self) -> &str {
        &self.as_str()[TIMESTAMP_LEN..]
    }

    /// Returns the Unix timestamp in milliseconds encoded in the timestamp segment.
    pub fn unix_ts_ms(&self) -> u64 {
        // eight base-62 digits always fit in u64
        self.0[..TIMESTAMP_LEN].iter().fold(0, |acc, &e| {
            acc * base62::RADIX + base62::digit_value(e).unwrap_or_default() as u64
        })
    }
}

impl fmt::Display for SortableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SortableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SortableId").field(&self.as_str()).finish()
    }
}

impl str::FromStr for SortableId {
    type Err = ParseError;

    /// Creates an object from the 16-symbol string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let dst = <[u8; ID_LEN]>::try_from(src.as_bytes()).map_err(|_| ParseError {})?;
        if dst.iter().all(|&e| base62::digit_value(e).is_some()) {
            Ok(Self(dst))
        } else {
            Err(ParseError {})
        }
    }
}

impl From<SortableId> for String {
    fn from(src: SortableId) -> Self {
        src.as_str().to_owned()
    }
}

impl TryFrom<String> for SortableId {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<SortableId> for [u8; ID_LEN] {
    fn from(src: SortableId) -> Self {
        src.0
    }
}

impl AsRef<str> for SortableId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Error parsing an invalid string representation of a sortable identifier.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid string representation")
    }
}

impl std::error::Error for ParseError {}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, SortableId};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for SortableId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    impl<'de> serde::Deserialize<'de> for SortableId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(VisitorImpl)
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = SortableId;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a 16-symbol base-62 identifier")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            let value = std::str::from_utf8(value).map_err(de::Error::custom)?;
            self.visit_str(value)
        }
    }

}
