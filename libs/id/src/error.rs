//! Error types for identifier decoding and codec registration.

use thiserror::Error;

use crate::IdKind;

/// Errors that can occur when decoding an identifier from its textual form.
///
/// These are expected on untrusted input and are always returned to the
/// caller, which decides how to present them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input does not have the canonical character count.
    #[error("identifier must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The input contains a character outside the canonical alphabet.
    #[error("invalid identifier character '{character}' at position {position}")]
    InvalidAlphabet { position: usize, character: char },

    /// The decoded value does not fit in 128 bits.
    #[error("identifier exceeds the 128-bit range")]
    Overflow,
}

impl DecodeError {
    /// Returns true if this error indicates a wrong input length.
    pub fn is_length_error(&self) -> bool {
        matches!(self, DecodeError::InvalidLength { .. })
    }

    /// Returns true if this error indicates a character outside the alphabet.
    pub fn is_alphabet_error(&self) -> bool {
        matches!(self, DecodeError::InvalidAlphabet { .. })
    }
}

/// Configuration faults detected while building a [`crate::CodecRegistry`].
///
/// These are fatal: a process that cannot build its registry must not serve
/// traffic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An identifier kind has no codec registered.
    #[error("no codec registered for identifier kind '{kind}'")]
    UnregisteredVariant { kind: IdKind },

    /// An identifier kind was registered more than once.
    #[error("identifier kind '{kind}' registered more than once")]
    DuplicateVariant { kind: IdKind },
}
