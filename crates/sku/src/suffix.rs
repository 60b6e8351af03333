//! Fixed-width base-36 suffix codec.
//!
//! The trailing 3 characters of every SKU encode the per-prefix sequence
//! number in base 36, most-significant digit first, left-padded with `'0'`.
//! Alphabet and width are part of the interface contract and must stay
//! stable for SKUs already in the wild.

use serde::{Deserialize, Serialize};

use amara_core::ValueObject;

use crate::error::SkuError;
use crate::sequence::SequenceNumber;

/// Digit alphabet, value 0 through 35.
pub const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Fixed suffix width in characters.
pub const SUFFIX_WIDTH: usize = 3;

/// Distinct sequence values per prefix: `36^3`.
pub const SEQUENCE_CAPACITY: u32 = 46_656;

/// A validated 3-character base-36 suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suffix(String);

impl Suffix {
    /// Encode a sequence number. Fails with [`SkuError::SequenceExhausted`]
    /// when `n` does not fit in the fixed width; the codec never wraps.
    pub fn encode(n: SequenceNumber) -> Result<Self, SkuError> {
        let value = n.value();
        if value >= SEQUENCE_CAPACITY {
            return Err(SkuError::SequenceExhausted {
                prefix: String::new(),
            });
        }

        let mut digits = [0u8; SUFFIX_WIDTH];
        let mut quotient = value;
        for slot in digits.iter_mut().rev() {
            *slot = SUFFIX_ALPHABET[(quotient % 36) as usize];
            quotient /= 36;
        }

        let mut text = String::with_capacity(SUFFIX_WIDTH);
        for digit in digits {
            text.push(digit as char);
        }
        Ok(Self(text))
    }

    /// Decode a suffix back to its sequence number. Exact inverse of
    /// [`Suffix::encode`]; rejects wrong width or foreign characters.
    pub fn decode(raw: &str) -> Result<SequenceNumber, SkuError> {
        if raw.len() != SUFFIX_WIDTH || !raw.is_ascii() {
            return Err(SkuError::InvalidSuffix { raw: raw.to_string() });
        }

        let mut value: u32 = 0;
        for b in raw.bytes() {
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'A'..=b'Z' => b - b'A' + 10,
                _ => return Err(SkuError::InvalidSuffix { raw: raw.to_string() }),
            };
            value = value * 36 + digit as u32;
        }

        Ok(SequenceNumber::new(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Suffix {}

impl core::fmt::Display for Suffix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
