//! # ruby-id
//!
//! Strongly-typed identifiers for every ruby domain entity.
//!
//! ## Design Principles
//!
//! - Every entity reference is its own type; a `CaseId` never stands in for an `ItemId`
//! - All identifiers are ULIDs: 128 bits, timestamp-prefixed, lexically sortable
//! - One canonical textual form per value, decoded with typed errors
//! - Codecs are registered once per identifier kind in an immutable [`CodecRegistry`]
//!
//! ## Wire Format
//!
//! Identifiers travel as 26 characters of Crockford base32:
//!
//! - `01HV4Z2WQXKJNM8GPQY6VBKC3D`
//!
//! Encoding is always uppercase. Decoding folds lowercase input (see
//! [`DECODE_CASE_POLICY`]) but never accepts the Crockford aliases `I`, `L`,
//! `O` or `U`.
//!
//! ## Type Separation
//!
//! A decoded identifier keeps its kind:
//!
//! ```
//! use ruby_id::{CodecRegistry, UserId};
//!
//! let registry = CodecRegistry::standard();
//! let id: UserId = registry.decode("01HV4Z2WQXKJNM8GPQY6VBKC3D").unwrap();
//! assert_eq!(id.encode(), "01HV4Z2WQXKJNM8GPQY6VBKC3D");
//! ```
//!
//! and never stands in for another kind, even with an equal payload:
//!
//! ```compile_fail
//! use ruby_id::{ItemId, UserId};
//!
//! let _: UserId = ItemId::new();
//! ```
//!
//! ```compile_fail
//! use ruby_id::{CaseId, ItemId};
//!
//! fn open(_: CaseId) {}
//! open(ItemId::new());
//! ```
//!
//! ```compile_fail
//! use ruby_id::{CodecRegistry, ItemId, UserId};
//!
//! let registry = CodecRegistry::standard();
//! let _: ItemId = registry.decode::<UserId>("01HV4Z2WQXKJNM8GPQY6VBKC3D").unwrap();
//! ```
//!
//! ```compile_fail
//! use ruby_id::{ItemId, Ulid, UserId};
//!
//! let raw = Ulid::new();
//! assert!(UserId::from_ulid(raw) == ItemId::from_ulid(raw));
//! ```

mod codec;
mod error;
mod generator;
mod macros;
mod registry;
mod types;

pub use codec::{decode, decode_with, encode, CasePolicy, ALPHABET, DECODE_CASE_POLICY, ENCODED_LEN};
pub use error::{DecodeError, RegistryError};
pub use generator::next_ulid;
pub use registry::{Codec, CodecRegistry, CodecRegistryBuilder, IdKind, Identifier};
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
