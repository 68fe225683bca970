//! Macros for defining typed ID types.

/// Macro to define a typed ID bound to an [`IdKind`](crate::IdKind).
///
/// This generates a newtype wrapper around ULID with:
/// - A `KIND` constant
/// - `new()` to generate a fresh, monotonically increasing ID
/// - `from_raw()`/`from_ulid()` to rebuild an ID from storage
/// - `encode()`/`decode()` through the canonical codec
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations (bare 26-character string)
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_id!(UserId, User);
/// define_id!(CaseId, Case);
///
/// let user_id = UserId::new();
/// let parsed: UserId = "01HV4Z2WQXKJNM8GPQY6VBKC3D".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:ident) => {
        /// A typed ID for this entity kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            /// The identifier kind for this ID type.
            pub const KIND: $crate::IdKind = $crate::IdKind::$kind;

            /// Creates a new ID with a fresh ULID.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::next_ulid())
            }

            /// Creates an ID from its raw 128-bit value.
            #[must_use]
            pub const fn from_raw(raw: u128) -> Self {
                Self($crate::Ulid(raw))
            }

            /// Returns the raw 128-bit value.
            #[must_use]
            pub const fn to_raw(&self) -> u128 {
                self.0 .0
            }

            /// Creates an ID from a raw ULID.
            #[must_use]
            pub const fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn ulid(&self) -> $crate::Ulid {
                self.0
            }

            /// Returns the timestamp portion of the ULID in milliseconds.
            #[must_use]
            pub fn timestamp_ms(&self) -> u64 {
                self.0.timestamp_ms()
            }

            /// Formats the ID in its canonical 26-character form.
            #[must_use]
            pub fn encode(&self) -> String {
                $crate::encode(self.0)
            }

            /// Parses an ID from its canonical form.
            pub fn decode(s: &str) -> Result<Self, $crate::DecodeError> {
                $crate::decode(s).map(Self)
            }
        }

        impl $crate::Identifier for $name {
            const KIND: $crate::IdKind = $crate::IdKind::$kind;

            fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            fn ulid(&self) -> $crate::Ulid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::decode(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.encode())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::decode(&s).map_err(|e| {
                    serde::de::Error::custom(format_args!("invalid {}: {}", Self::KIND, e))
                })
            }
        }

        impl AsRef<$crate::Ulid> for $name {
            fn as_ref(&self) -> &$crate::Ulid {
                &self.0
            }
        }

        impl From<$name> for $crate::Ulid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}
