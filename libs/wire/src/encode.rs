//! Cycle-safe graph serializer.
//!
//! A [`GraphSerializer`] walks a value depth first, fields in declaration
//! order, and builds a JSON tree. Every object reachable through a shared
//! handle (`Rc`, `Arc`, an upgraded `Weak`, or the value inside a `RefCell`)
//! is recorded in a visited-set owned by the [`GraphWalker`] of that single
//! call. Entering an object that is already recorded yields `null` instead of
//! recursing.
//!
//! Identity is the value's address together with its type, so the same case
//! is recognized whether the root is passed as `&Rc<RefCell<Case>>`,
//! `&RefCell<Case>` or the borrowed `&Case`. The root is recorded before the
//! walk starts.

use std::any::type_name;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use ruby_id::{CodecRegistry, Identifier};
use tracing::{trace, warn};

use crate::{naming, WireError};

/// The JSON tree produced by the serializer.
pub type WireValue = serde_json::Value;

/// An entity owned by one aggregate and referenced from others.
pub type Shared<T> = Rc<RefCell<T>>;

/// A non-owning reference back to an aggregate.
pub type Backref<T> = rc::Weak<RefCell<T>>;

/// How repeated references to the same shared object are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Every shared object is emitted at most once per document; any later
    /// encounter, cyclic or not, becomes `null`. Output size is bounded by the
    /// number of distinct objects.
    #[default]
    IgnoreRepeated,
    /// Only an object already on the current path becomes `null`. Siblings
    /// sharing an object each receive a full copy.
    IgnoreCycles,
}

/// Identity of a value during one walk: its address and its type.
type Identity = (*const (), &'static str);

fn identity_of<T: ?Sized>(value: &T) -> Identity {
    ((value as *const T).cast::<()>(), type_name::<T>())
}

/// Options fixed when a serializer is constructed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializerOptions {
    pub references: ReferencePolicy,
    pub pretty: bool,
}

/// A type that can be written to the wire.
///
/// Implemented for scalars, collections, shared handles and identifiers, and
/// generated for response types by [`crate::define_wire_object!`] and
/// [`crate::define_wire_enum!`].
pub trait Encode {
    /// Writes `self` using the walker's registry and visited-set.
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue;
}

/// Converts response graphs to JSON.
///
/// Holds only immutable state; one serializer can be shared by every request
/// handler.
#[derive(Debug, Clone)]
pub struct GraphSerializer {
    registry: Arc<CodecRegistry>,
    options: SerializerOptions,
}

impl GraphSerializer {
    /// Creates a serializer with default options.
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self::with_options(registry, SerializerOptions::default())
    }

    /// Creates a serializer with explicit options.
    pub fn with_options(registry: Arc<CodecRegistry>, options: SerializerOptions) -> Self {
        Self { registry, options }
    }

    /// The registry used for identifier fields.
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// The options this serializer was built with.
    pub fn options(&self) -> SerializerOptions {
        self.options
    }

    /// Builds the JSON tree for `root`.
    pub fn to_value<T: Encode + ?Sized>(&self, root: &T) -> WireValue {
        let mut walker = GraphWalker::new(&self.registry, self.options.references);
        walker.visited.insert(identity_of(root));
        root.encode(&mut walker)
    }

    /// Serializes `root` to a JSON string.
    pub fn to_string<T: Encode + ?Sized>(&self, root: &T) -> Result<String, WireError> {
        let value = self.to_value(root);
        let json = if self.options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(json)
    }

    /// Serializes `root` into a writer.
    pub fn to_writer<W, T>(&self, writer: W, root: &T) -> Result<(), WireError>
    where
        W: io::Write,
        T: Encode + ?Sized,
    {
        let value = self.to_value(root);
        if self.options.pretty {
            serde_json::to_writer_pretty(writer, &value)?;
        } else {
            serde_json::to_writer(writer, &value)?;
        }
        Ok(())
    }
}

/// Per-call traversal state: the registry and the visited-set.
pub struct GraphWalker<'a> {
    registry: &'a CodecRegistry,
    policy: ReferencePolicy,
    visited: HashSet<Identity>,
}

impl<'a> GraphWalker<'a> {
    /// Starts a fresh traversal.
    pub fn new(registry: &'a CodecRegistry, policy: ReferencePolicy) -> Self {
        Self {
            registry,
            policy,
            visited: HashSet::new(),
        }
    }

    /// Encodes an identifier through the registry.
    pub fn identifier<I: Identifier>(&mut self, id: &I) -> WireValue {
        WireValue::String(self.registry.encode(*id))
    }

    /// Encodes an object from its fields, in order.
    ///
    /// Field names must be distinct on the wire; the schema introspector
    /// rejects types that break this.
    pub fn object(&mut self, fields: &[(&str, &dyn Encode)]) -> WireValue {
        let mut map = serde_json::Map::with_capacity(fields.len());
        for (name, value) in fields {
            let encoded = value.encode(self);
            map.insert(naming::wire_name(name), encoded);
        }
        WireValue::Object(map)
    }

    /// Encodes a sequence of values.
    pub fn sequence<'v, T, It>(&mut self, items: It) -> WireValue
    where
        T: Encode + ?Sized + 'v,
        It: IntoIterator<Item = &'v T>,
    {
        WireValue::Array(items.into_iter().map(|item| item.encode(self)).collect())
    }

    /// Encodes a shared object, or `null` if the same object was already
    /// entered.
    pub fn shared<T: Encode + ?Sized>(&mut self, target: &T) -> WireValue {
        let identity = identity_of(target);
        if !self.visited.insert(identity) {
            trace!(address = ?identity.0, ty = identity.1, "flattening repeated reference to null");
            return WireValue::Null;
        }

        let value = target.encode(self);

        if self.policy == ReferencePolicy::IgnoreCycles {
            self.visited.remove(&identity);
        }
        value
    }

    /// Number of objects currently recorded.
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}

// =============================================================================
// Scalars
// =============================================================================

impl Encode for bool {
    fn encode(&self, _: &mut GraphWalker<'_>) -> WireValue {
        WireValue::Bool(*self)
    }
}

macro_rules! encode_number {
    ($($t:ty),* $(,)?) => {
        $(
            impl Encode for $t {
                fn encode(&self, _: &mut GraphWalker<'_>) -> WireValue {
                    WireValue::from(*self)
                }
            }
        )*
    };
}

encode_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Encode for str {
    fn encode(&self, _: &mut GraphWalker<'_>) -> WireValue {
        WireValue::String(self.to_owned())
    }
}

impl Encode for String {
    fn encode(&self, _: &mut GraphWalker<'_>) -> WireValue {
        WireValue::String(self.clone())
    }
}

impl Encode for WireValue {
    fn encode(&self, _: &mut GraphWalker<'_>) -> WireValue {
        self.clone()
    }
}

impl Encode for DateTime<Utc> {
    fn encode(&self, _: &mut GraphWalker<'_>) -> WireValue {
        WireValue::String(self.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

// =============================================================================
// Containers
// =============================================================================

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        (**self).encode(walker)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        (**self).encode(walker)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        match self {
            Some(value) => value.encode(walker),
            None => WireValue::Null,
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        walker.sequence(self)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        walker.sequence(self)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        let mut map = serde_json::Map::with_capacity(self.len());
        for (key, value) in self {
            let encoded = value.encode(walker);
            map.insert(key.clone(), encoded);
        }
        WireValue::Object(map)
    }
}

impl<T: Encode + ?Sized> Encode for RefCell<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        match self.try_borrow() {
            Ok(inner) => walker.shared(&*inner),
            Err(_) => {
                warn!("value is mutably borrowed during serialization, emitting null");
                WireValue::Null
            }
        }
    }
}

// =============================================================================
// Shared handles
// =============================================================================

impl<T: Encode + ?Sized> Encode for Rc<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        walker.shared(&**self)
    }
}

impl<T: Encode + ?Sized> Encode for Arc<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        walker.shared(&**self)
    }
}

impl<T: Encode + ?Sized> Encode for rc::Weak<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        match self.upgrade() {
            Some(strong) => strong.encode(walker),
            None => WireValue::Null,
        }
    }
}

impl<T: Encode + ?Sized> Encode for sync::Weak<T> {
    fn encode(&self, walker: &mut GraphWalker<'_>) -> WireValue {
        match self.upgrade() {
            Some(strong) => strong.encode(walker),
            None => WireValue::Null,
        }
    }
}
