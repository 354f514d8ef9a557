//! Compact base-62 identifiers: uniformly random strings and time-sortable IDs
//!
//! ```rust
//! let id = id62::create_sortable_id()?;
//! println!("{}", id); // e.g., "0SzIuK6H8Zq0pWfA"
//!
//! let token = id62::create_id(24)?;
//! println!("{}", token); // e.g., "Xk2b0QmT7sVwE9aLz4NcR1pY"
//! # Ok::<(), id62::Error>(())
//! ```
//!
//! # Alphabet
//!
//! All identifiers are drawn from the 62 symbols `0-9`, `A-Z` and `a-z`, valued 0 to 61 in that
//! order. The order matches ASCII, so the value of a symbol and its string sort position agree.
//!
//! # Sortable identifier layout
//!
//! ```text
//! +--------+--------+
//! |  time  |  rand  |
//! +--------+--------+
//!  8 chars  8 chars
//! ```
//!
//! Where:
//!
//! - `time` is the Unix timestamp in milliseconds as a base-62 numeral left-padded with `0`. Eight
//!   symbols hold values below 62^8, which is enough for several thousand years.
//! - `rand` is drawn fresh from a cryptographically strong random number source whenever the
//!   millisecond changes. Within the same millisecond, it is the previous `rand` plus one as a
//!   base-62 numeral, so identifiers generated in a row sort in the order they were generated.
//!
//! If `rand` cannot be incremented further within one millisecond, generation fails with
//! [`Error::Overflow`] instead of wrapping around. The order is guaranteed only within one
//! generator; it says nothing across processes or machines, and a clock that moves backwards
//! breaks it.
//!
//! # Random symbols
//!
//! Random bytes are mapped to symbols by rejection sampling: bytes up to 247 (four full cycles of
//! 62) are taken modulo 62 and bytes 248 to 255 are discarded, so every symbol is equally likely.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables [`create_sortable_id`] and [`create_id`], which share a process-wide
//!   generator seeded from the operating system.
//!
//! Optional features:
//!
//! - `serde`: enables serialization and deserialization of [`SortableId`] as a string.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base62;

mod error;
pub use error::Error;

mod id;
pub use id::{ParseError, SortableId, ID_LEN, SEGMENT_LEN, TIMESTAMP_LEN};

pub mod segment;
pub use segment::{SegmentGenerator, DEFAULT_ID_LENGTH};

pub mod generator;
pub use generator::SortableGenerator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{create_id, create_sortable_id};
