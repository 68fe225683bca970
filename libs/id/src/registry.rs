//! Codec registry: one encode/decode pair per identifier kind.
//!
//! The set of identifier kinds is closed ([`IdKind`]). Each identifier type
//! names its kind through [`Identifier::KIND`], so lookups are resolved by
//! type and a missing kind can only come from an incomplete registration,
//! which [`CodecRegistryBuilder::build`] rejects at startup.

use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

use ulid::Ulid;

use crate::codec::{self, CasePolicy, DECODE_CASE_POLICY};
use crate::{DecodeError, RegistryError};

/// Every identifier kind known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdKind {
    User,
    Item,
    ItemType,
    Case,
    CaseType,
    OutboxMessage,
    /// A bare ULID used directly on a field.
    Ulid,
}

impl IdKind {
    /// Number of identifier kinds.
    pub const COUNT: usize = 7;

    /// All kinds, in registry order.
    pub const ALL: [IdKind; Self::COUNT] = [
        IdKind::User,
        IdKind::Item,
        IdKind::ItemType,
        IdKind::Case,
        IdKind::CaseType,
        IdKind::OutboxMessage,
        IdKind::Ulid,
    ];

    /// The name used for this kind on the wire and in schema formats.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            IdKind::User => "user_id",
            IdKind::Item => "item_id",
            IdKind::ItemType => "item_type_id",
            IdKind::Case => "case_id",
            IdKind::CaseType => "case_type_id",
            IdKind::OutboxMessage => "outbox_message_id",
            IdKind::Ulid => "ulid",
        }
    }

    /// The Rust type carrying this kind.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            IdKind::User => "UserId",
            IdKind::Item => "ItemId",
            IdKind::ItemType => "ItemTypeId",
            IdKind::Case => "CaseId",
            IdKind::CaseType => "CaseTypeId",
            IdKind::OutboxMessage => "OutboxMessageId",
            IdKind::Ulid => "Ulid",
        }
    }

    /// Resolves a kind from its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A strongly-typed identifier backed by a ULID.
///
/// Implemented by every type generated with [`crate::define_id!`] and by
/// [`Ulid`] itself.
pub trait Identifier: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// The kind this type represents.
    const KIND: IdKind;

    /// Wraps a raw ULID.
    fn from_ulid(ulid: Ulid) -> Self;

    /// Returns the underlying ULID.
    fn ulid(&self) -> Ulid;
}

impl Identifier for Ulid {
    const KIND: IdKind = IdKind::Ulid;

    fn from_ulid(ulid: Ulid) -> Self {
        ulid
    }

    fn ulid(&self) -> Ulid {
        *self
    }
}

/// An encode/decode pair for one identifier kind.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    kind: IdKind,
    encode: fn(Ulid) -> String,
    decode: fn(&str, CasePolicy) -> Result<Ulid, DecodeError>,
}

impl Codec {
    /// The canonical base32 codec for a kind.
    #[must_use]
    pub const fn canonical(kind: IdKind) -> Self {
        Self {
            kind,
            encode: codec::encode,
            decode: codec::decode_with,
        }
    }

    /// The kind this codec is registered for.
    #[must_use]
    pub const fn kind(&self) -> IdKind {
        self.kind
    }

    /// Encodes a raw value.
    #[must_use]
    pub fn encode(&self, ulid: Ulid) -> String {
        (self.encode)(ulid)
    }

    /// Decodes a raw value using [`DECODE_CASE_POLICY`].
    pub fn decode(&self, input: &str) -> Result<Ulid, DecodeError> {
        self.decode_with(input, DECODE_CASE_POLICY)
    }

    /// Decodes a raw value with an explicit case policy.
    pub fn decode_with(&self, input: &str, policy: CasePolicy) -> Result<Ulid, DecodeError> {
        (self.decode)(input, policy)
    }
}

/// Immutable table of codecs, one per [`IdKind`].
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: [Codec; IdKind::COUNT],
}

impl CodecRegistry {
    /// Returns a builder for an explicitly registered table.
    #[must_use]
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// A registry with the canonical codec for every kind.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            codecs: IdKind::ALL.map(Codec::canonical),
        }
    }

    /// The process-wide standard registry.
    pub fn global() -> &'static CodecRegistry {
        static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::standard)
    }

    /// Returns the codec registered for a kind.
    #[must_use]
    pub fn codec(&self, kind: IdKind) -> &Codec {
        &self.codecs[kind.index()]
    }

    /// Returns the codec registered for an identifier type.
    #[must_use]
    pub fn codec_for<I: Identifier>(&self) -> &Codec {
        self.codec(I::KIND)
    }

    /// Encodes a typed identifier.
    #[must_use]
    pub fn encode<I: Identifier>(&self, id: I) -> String {
        self.codec_for::<I>().encode(id.ulid())
    }

    /// Decodes a typed identifier.
    pub fn decode<I: Identifier>(&self, input: &str) -> Result<I, DecodeError> {
        self.codec_for::<I>().decode(input).map(I::from_ulid)
    }

    /// Decodes an untyped value for a kind resolved at runtime.
    ///
    /// Intended for tooling; application code should use [`Self::decode`].
    pub fn decode_kind(&self, kind: IdKind, input: &str) -> Result<Ulid, DecodeError> {
        self.codec(kind).decode(input)
    }
}

/// Collects codec registrations and validates that the table is complete.
#[derive(Debug, Default)]
pub struct CodecRegistryBuilder {
    slots: [Option<Codec>; IdKind::COUNT],
    duplicate: Option<IdKind>,
}

impl CodecRegistryBuilder {
    /// Registers the canonical codec for an identifier type.
    #[must_use]
    pub fn register<I: Identifier>(self) -> Self {
        self.register_kind(I::KIND)
    }

    /// Registers the canonical codec for a kind.
    #[must_use]
    pub fn register_kind(mut self, kind: IdKind) -> Self {
        let slot = &mut self.slots[kind.index()];
        if slot.is_some() {
            if self.duplicate.is_none() {
                self.duplicate = Some(kind);
            }
        } else {
            *slot = Some(Codec::canonical(kind));
        }
        self
    }

    /// Validates and freezes the table.
    pub fn build(self) -> Result<CodecRegistry, RegistryError> {
        if let Some(kind) = self.duplicate {
            return Err(RegistryError::DuplicateVariant { kind });
        }

        let mut codecs = [Codec::canonical(IdKind::User); IdKind::COUNT];
        for kind in IdKind::ALL {
            let codec = self.slots[kind.index()].ok_or(RegistryError::UnregisteredVariant { kind })?;
            codecs[kind.index()] = codec;
        }

        Ok(CodecRegistry { codecs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CaseId, CaseTypeId, ItemId, ItemTypeId, OutboxMessageId, UserId};

    fn full_builder() -> CodecRegistryBuilder {
        CodecRegistry::builder()
            .register::<UserId>()
            .register::<ItemId>()
            .register::<ItemTypeId>()
            .register::<CaseId>()
            .register::<CaseTypeId>()
            .register::<OutboxMessageId>()
            .register::<Ulid>()
    }

    #[test]
    fn test_complete_registration_builds() {
        let registry = full_builder().build().unwrap();
        for kind in IdKind::ALL {
            assert_eq!(registry.codec(kind).kind(), kind);
        }
    }

    #[test]
    fn test_missing_registration_is_reported() {
        let err = CodecRegistry::builder()
            .register::<UserId>()
            .register::<ItemId>()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnregisteredVariant {
                kind: IdKind::ItemType
            }
        );
    }

    #[test]
    fn test_duplicate_registration_is_reported() {
        let err = full_builder().register::<CaseId>().build().unwrap_err();
        assert_eq!(err, RegistryError::DuplicateVariant { kind: IdKind::Case });
    }

    #[test]
    fn test_registry_roundtrip_typed() {
        let registry = CodecRegistry::standard();
        let id = CaseId::new();
        let s = registry.encode(id);
        let parsed: CaseId = registry.decode(&s).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_registry_decode_error_is_typed() {
        let registry = CodecRegistry::global();
        let err = registry.decode::<UserId>("nope").unwrap_err();
        assert!(err.is_length_error());
    }

    #[test]
    fn test_codec_decode_honors_case_policy() {
        let registry = CodecRegistry::standard();
        let codec = registry.codec(IdKind::Case);
        let lower = "01hv4z2wqxkjnm8gpqy6vbkc3d";

        assert_eq!(
            codec.decode(lower),
            codec.decode_with("01HV4Z2WQXKJNM8GPQY6VBKC3D", CasePolicy::Strict)
        );
        assert_eq!(
            codec.decode_with(lower, CasePolicy::Strict).unwrap_err(),
            DecodeError::InvalidAlphabet {
                position: 2,
                character: 'h'
            }
        );
    }

    #[test]
    fn test_kind_names_unique_and_resolvable() {
        let names: std::collections::HashSet<_> = IdKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), IdKind::COUNT);
        for kind in IdKind::ALL {
            assert_eq!(IdKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(IdKind::from_name("org_id"), None);
    }

    #[test]
    fn test_kind_order_matches_index() {
        for (index, kind) in IdKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), index);
        }
    }
}
