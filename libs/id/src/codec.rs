//! Canonical textual codec for 128-bit identifiers.
//!
//! The encoding is Crockford base32, most significant digit first, padded to
//! 26 characters. Lexical order of encoded strings equals numeric order of the
//! underlying values.

use ulid::Ulid;

use crate::DecodeError;

/// Length of every encoded identifier.
pub const ENCODED_LEN: usize = 26;

/// Canonical alphabet, in digit order.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// How [`decode`] treats letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    /// Only the uppercase canonical alphabet is accepted.
    Strict,
    /// Lowercase letters are folded to uppercase before validation.
    FoldLowercase,
}

/// Case policy applied by [`decode`] and every identifier's `decode`/`FromStr`.
pub const DECODE_CASE_POLICY: CasePolicy = CasePolicy::FoldLowercase;

const INVALID: u8 = 0xFF;

const DECODE_TABLE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut digit = 0;
    while digit < ALPHABET.len() {
        table[ALPHABET[digit] as usize] = digit as u8;
        digit += 1;
    }
    table
};

/// Encodes a value in its canonical 26-character form.
#[must_use]
pub fn encode(value: Ulid) -> String {
    value.to_string()
}

/// Decodes a canonical string using [`DECODE_CASE_POLICY`].
pub fn decode(input: &str) -> Result<Ulid, DecodeError> {
    decode_with(input, DECODE_CASE_POLICY)
}

/// Decodes a canonical string with an explicit case policy.
pub fn decode_with(input: &str, policy: CasePolicy) -> Result<Ulid, DecodeError> {
    let actual = input.chars().count();
    if actual != ENCODED_LEN {
        return Err(DecodeError::InvalidLength {
            expected: ENCODED_LEN,
            actual,
        });
    }

    let mut value: u128 = 0;
    for (position, character) in input.chars().enumerate() {
        let digit = digit_value(character, policy)
            .ok_or(DecodeError::InvalidAlphabet { position, character })?;
        value = value
            .checked_mul(32)
            .and_then(|shifted| shifted.checked_add(u128::from(digit)))
            .ok_or(DecodeError::Overflow)?;
    }

    Ok(Ulid::from(value))
}

fn digit_value(character: char, policy: CasePolicy) -> Option<u8> {
    if !character.is_ascii() {
        return None;
    }
    let byte = match policy {
        CasePolicy::Strict => character as u8,
        CasePolicy::FoldLowercase => character.to_ascii_uppercase() as u8,
    };
    match DECODE_TABLE[byte as usize] {
        INVALID => None,
        digit => Some(digit),
    }
}
