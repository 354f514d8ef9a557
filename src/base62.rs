//! Base-62 numerals over the `0-9A-Za-z` alphabet.
//!
//! The alphabet is laid out in ASCII order, so the numeric value of a symbol and its sort position
//! coincide; fixed-width numerals therefore compare as strings exactly as they compare as
//! integers.

use std::fmt;

/// The 62 symbols in ascending order of value.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// The number of symbols in [`ALPHABET`].
pub const RADIX: u64 = 62;

/// The symbol of value zero, used for left padding.
pub const ZERO: u8 = ALPHABET[0];

/// The symbol of the largest value.
pub const MAX_DIGIT: u8 = ALPHABET[61];

/// Returns the numeric value of `symbol`, or `None` if it is not in the alphabet.
///
/// # Examples
///
/// ```rust
/// use id62::base62::digit_value;
///
/// assert_eq!(digit_value(b'9'), Some(9));
/// assert_eq!(digit_value(b'A'), Some(10));
/// assert_eq!(digit_value(b'z'), Some(61));
/// assert_eq!(digit_value(b'-'), None);
/// ```
pub const fn digit_value(symbol: u8) -> Option<u8> {
    match symbol {
        b'0'..=b'9' => Some(symbol - b'0'),
        b'A'..=b'Z' => Some(symbol - b'A' + 10),
        b'a'..=b'z' => Some(symbol - b'a' + 36),
        _ => None,
    }
}

/// Encodes `value` in its shortest base-62 form. Zero encodes to `"0"`.
///
/// # Examples
///
/// ```rust
/// use id62::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(mut value: u64) -> String {
    // u64::MAX takes 11 digits
    let mut buffer = [ZERO; 11];
    let mut start = buffer.len();
    loop {
        start -= 1;
        buffer[start] = ALPHABET[(value % RADIX) as usize];
        value /= RADIX;
        if value == 0 {
            break;
        }
    }
    buffer[start..].iter().map(|&e| e as char).collect()
}

/// Encodes `value` as a big-endian numeral of exactly `N` symbols, left-padded with [`ZERO`].
///
/// # Panics
///
/// Panics if `value` needs more than `N` digits.
pub fn encode_padded<const N: usize>(mut value: u64) -> [u8; N] {
    let mut buffer = [ZERO; N];
    for e in buffer.iter_mut().rev() {
        *e = ALPHABET[(value % RADIX) as usize];
        value /= RADIX;
    }
    assert!(value == 0, "value does not fit in {} base-62 digits", N);
    buffer
}

/// Decodes a big-endian numeral, returning `None` if `digits` is empty, contains a symbol outside
/// the alphabet, or overflows `u64`.
///
/// # Examples
///
/// ```rust
/// use id62::base62::decode;
///
/// assert_eq!(decode(b"10"), Some(62));
/// assert_eq!(decode(b"0000000z"), Some(61));
/// assert_eq!(decode(b"1-"), None);
/// ```
pub fn decode(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u64, |acc, &e| {
        acc.checked_mul(RADIX)?
            .checked_add(digit_value(e)? as u64)
    })
}

/// Adds one to a fixed-width big-endian numeral in place, carrying leftward.
///
/// Returns [`Overflow`] and leaves `digits` untouched if every symbol already holds the maximum
/// value, so a wrapped-around numeral is never produced.
///
/// # Panics
///
/// Panics if `digits` contains a symbol outside the alphabet.
///
/// # Examples
///
/// ```rust
/// use id62::base62::increment;
///
/// let mut digits = *b"0000000z";
/// increment(&mut digits)?;
/// assert_eq!(&digits, b"00000010");
///
/// let mut digits = *b"zzzzzzzz";
/// assert!(increment(&mut digits).is_err());
/// assert_eq!(&digits, b"zzzzzzzz");
/// # Ok::<(), id62::base62::Overflow>(())
/// ```
pub fn increment(digits: &mut [u8]) -> Result<(), Overflow> {
    let Some(pos) = digits.iter().rposition(|&e| e != MAX_DIGIT) else {
        return Err(Overflow);
    };
    let value = digit_value(digits[pos]).expect("symbol outside base-62 alphabet");
    digits[pos] = ALPHABET[value as usize + 1];
    digits[pos + 1..].fill(ZERO);
    Ok(())
}

/// Error returned when [`increment`] cannot add one without widening the numeral.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Overflow;

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base-62 numeral overflowed its fixed width")
    }
}

impl std::error::Error for Overflow {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps alphabet positions to expected symbols
    #[test]
    fn maps_alphabet_positions_to_expected_symbols() {
        assert_eq!(ALPHABET.len(), 62);
        for (i, c) in [(0, b'0'), (9, b'9'), (10, b'A'), (35, b'Z'), (36, b'a'), (61, b'z')] {
            assert_eq!(ALPHABET[i], c);
            assert_eq!(digit_value(c), Some(i as u8));
        }
    }

    /// Orders symbols by value
    #[test]
    fn orders_symbols_by_value() {
        for w in ALPHABET.windows(2) {
            assert!(w[0] < w[1]);
        }
        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(digit_value(c), Some(i as u8));
        }
        for c in [b' ', b'+', b'/', b'-', b'_', b'@', b'[', b'`', b'{', 0x80] {
            assert_eq!(digit_value(c), None);
        }
    }

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        let cases: &[(u64, &str)] = &[
            (0, "0"),
            (9, "9"),
            (10, "A"),
            (61, "z"),
            (62, "10"),
            (3843, "zz"),
            (3844, "100"),
            (218_340_105_584_895, "zzzzzzzz"),
            (u64::MAX, "LygHa16AHYF"),
        ];

        for &(value, text) in cases {
            assert_eq!(encode(value), text);
            assert_eq!(decode(text.as_bytes()), Some(value));
        }
    }

    /// Left-pads to fixed width
    #[test]
    fn left_pads_to_fixed_width() {
        assert_eq!(&encode_padded::<8>(0), b"00000000");
        assert_eq!(&encode_padded::<8>(62), b"00000010");
        assert_eq!(&encode_padded::<8>(218_340_105_584_895), b"zzzzzzzz");

        // 2022-03-06T12:34:56.789Z
        let ts = 1_646_570_096_789u64;
        let padded = encode_padded::<8>(ts);
        assert_eq!(padded[..], *format!("{:0>8}", encode(ts)).as_bytes());
        assert_eq!(decode(&padded), Some(ts));
    }

    /// Panics if value does not fit in width
    #[test]
    #[should_panic]
    fn panics_if_value_does_not_fit_in_width() {
        encode_padded::<8>(218_340_105_584_896);
    }

    /// Rejects malformed numerals on decode
    #[test]
    fn rejects_malformed_numerals_on_decode() {
        assert_eq!(decode(b""), None);
        assert_eq!(decode(b"0 1"), None);
        assert_eq!(decode(b"-1"), None);
        assert_eq!(decode(b"LygHa16AHYG"), None);
        assert_eq!(decode(b"100000000000"), None);
    }

    /// Increments with carry
    #[test]
    fn increments_with_carry() {
        let cases: &[(&[u8; 8], &[u8; 8])] = &[
            (b"00000000", b"00000001"),
            (b"00000009", b"0000000A"),
            (b"0000000Z", b"0000000a"),
            (b"0000000z", b"00000010"),
            (b"0000zzzz", b"00010000"),
            (b"yzzzzzzz", b"z0000000"),
            (b"zzzzzzzy", b"zzzzzzzz"),
        ];

        for &(src, expected) in cases {
            let mut digits = *src;
            assert_eq!(increment(&mut digits), Ok(()));
            assert_eq!(&digits, expected);
            assert!(src < expected);
            assert_eq!(decode(src).map(|e| e + 1), decode(expected));
        }
    }

    /// Reports overflow without wrapping
    #[test]
    fn reports_overflow_without_wrapping() {
        let mut digits = [MAX_DIGIT; 8];
        assert_eq!(increment(&mut digits), Err(Overflow));
        assert_eq!(digits, [MAX_DIGIT; 8]);

        let mut empty: [u8; 0] = [];
        assert_eq!(increment(&mut empty), Err(Overflow));
    }
}
