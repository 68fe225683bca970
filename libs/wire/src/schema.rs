//! Schema introspection for API documentation.
//!
//! [`Describe`] is the compile-time counterpart of [`crate::Encode`]: every
//! type that can be written to the wire can also describe its wire shape.
//! Identifier types describe themselves as strings whose `format` is the
//! identifier kind, so the 128-bit payload never appears in documentation.
//!
//! Named objects and enums are emitted once as components and referenced with
//! `$ref`, which also terminates recursive type graphs.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::{self, Rc};
use std::sync::{self, Arc};

use chrono::{DateTime, Utc};
use ruby_id::{CodecRegistry, Identifier};
use serde::{Serialize, Serializer};
use serde_json::{json, Map};
use tracing::debug;

use crate::{naming, SchemaError, WireValue};

/// Description attached to every shared reference.
pub const SHARED_REFERENCE_DESCRIPTION: &str =
    "Flattened to null when the same object was already emitted earlier in this document.";

/// A documentation-level description of one wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaFragment {
    /// A string, optionally with a format such as `date-time` or `case_id`.
    String { format: Option<&'static str> },
    Integer { format: &'static str },
    Number { format: &'static str },
    Boolean,
    Array(Box<SchemaFragment>),
    /// An object with arbitrary string keys.
    Map(Box<SchemaFragment>),
    /// An object with known properties, in declaration order.
    Object { properties: Vec<(String, SchemaFragment)> },
    /// A closed set of symbolic string values.
    Enum { values: Vec<String> },
    /// A reference to a named component.
    Reference(&'static str),
    Nullable(Box<SchemaFragment>),
    /// A shared handle; nullable because repeated references are flattened.
    Shared(Box<SchemaFragment>),
    /// Any JSON value.
    Any,
}

impl SchemaFragment {
    /// Renders the fragment as an OpenAPI 3.0 schema object.
    pub fn to_json(&self) -> WireValue {
        match self {
            SchemaFragment::String { format } => {
                let mut map = Map::new();
                map.insert("type".into(), json!("string"));
                if let Some(format) = format {
                    map.insert("format".into(), json!(format));
                }
                WireValue::Object(map)
            }
            SchemaFragment::Integer { format } => json!({"type": "integer", "format": format}),
            SchemaFragment::Number { format } => json!({"type": "number", "format": format}),
            SchemaFragment::Boolean => json!({"type": "boolean"}),
            SchemaFragment::Array(items) => json!({"type": "array", "items": items.to_json()}),
            SchemaFragment::Map(values) => {
                json!({"type": "object", "additionalProperties": values.to_json()})
            }
            SchemaFragment::Object { properties } => {
                let mut props = Map::with_capacity(properties.len());
                for (name, fragment) in properties {
                    props.insert(name.clone(), fragment.to_json());
                }
                let required: Vec<&str> = properties.iter().map(|(name, _)| name.as_str()).collect();
                json!({"type": "object", "properties": props, "required": required})
            }
            SchemaFragment::Enum { values } => json!({"type": "string", "enum": values}),
            SchemaFragment::Reference(name) => {
                json!({"$ref": format!("#/components/schemas/{name}")})
            }
            SchemaFragment::Nullable(inner) => nullable(inner, None),
            SchemaFragment::Shared(inner) => nullable(inner, Some(SHARED_REFERENCE_DESCRIPTION)),
            SchemaFragment::Any => json!({}),
        }
    }

    /// Returns true if the fragment documents a plain string.
    pub fn is_string(&self) -> bool {
        matches!(self, SchemaFragment::String { .. } | SchemaFragment::Enum { .. })
    }
}

fn nullable(inner: &SchemaFragment, description: Option<&str>) -> WireValue {
    let mut map = match inner.to_json() {
        WireValue::Object(map) if !map.contains_key("$ref") => map,
        other => {
            let mut map = Map::new();
            map.insert("allOf".into(), json!([other]));
            map
        }
    };
    map.insert("nullable".into(), json!(true));
    if let Some(description) = description {
        map.insert("description".into(), json!(description));
    }
    WireValue::Object(map)
}

impl Serialize for SchemaFragment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

/// A type whose wire shape can be documented.
pub trait Describe: 'static {
    /// Describes the type's wire shape.
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment;

    /// Named types are stored once as components and referenced elsewhere.
    fn component_name() -> Option<&'static str> {
        None
    }
}

/// Accumulates components while types are described.
pub struct SchemaGenerator<'a> {
    registry: &'a CodecRegistry,
    components: BTreeMap<&'static str, SchemaFragment>,
    owners: BTreeMap<&'static str, TypeId>,
    conflicts: BTreeSet<&'static str>,
    duplicate_fields: BTreeSet<(&'static str, String)>,
}

impl<'a> SchemaGenerator<'a> {
    fn new(registry: &'a CodecRegistry) -> Self {
        Self {
            registry,
            components: BTreeMap::new(),
            owners: BTreeMap::new(),
            conflicts: BTreeSet::new(),
            duplicate_fields: BTreeSet::new(),
        }
    }

    /// Describes `T`, registering it as a component if it is named.
    pub fn fragment_of<T: Describe + ?Sized>(&mut self) -> SchemaFragment {
        let Some(name) = T::component_name() else {
            return T::describe(self);
        };

        let type_id = TypeId::of::<T>();
        match self.owners.get(name) {
            Some(owner) if *owner != type_id => {
                self.conflicts.insert(name);
            }
            Some(_) => {}
            None => {
                // Claim the name before describing so recursive fields resolve
                // to a reference.
                self.owners.insert(name, type_id);
                let fragment = T::describe(self);
                self.record_duplicate_fields(name, &fragment);
                self.components.insert(name, fragment);
            }
        }
        SchemaFragment::Reference(name)
    }

    fn record_duplicate_fields(&mut self, component: &'static str, fragment: &SchemaFragment) {
        let SchemaFragment::Object { properties } = fragment else {
            return;
        };
        let mut seen = BTreeSet::new();
        for (field, _) in properties {
            if !seen.insert(field.as_str()) {
                self.duplicate_fields.insert((component, field.clone()));
            }
        }
    }

    /// Describes an identifier type as a string formatted by its kind.
    pub fn identifier<I: Identifier>(&mut self) -> SchemaFragment {
        SchemaFragment::String {
            format: Some(self.registry.codec_for::<I>().kind().name()),
        }
    }

    /// Describes an object from its declared fields, applying the wire naming
    /// rule.
    pub fn object(&mut self, fields: Vec<(&str, SchemaFragment)>) -> SchemaFragment {
        SchemaFragment::Object {
            properties: fields
                .into_iter()
                .map(|(name, fragment)| (naming::wire_name(name), fragment))
                .collect(),
        }
    }

    /// Describes a closed set of symbols, applying the wire naming rule.
    pub fn enumeration(&mut self, symbols: &[&str]) -> SchemaFragment {
        SchemaFragment::Enum {
            values: symbols.iter().map(|s| naming::wire_name(s)).collect(),
        }
    }
}

/// Builds a [`SchemaCatalog`] at startup.
pub struct SchemaIntrospector<'a> {
    generator: SchemaGenerator<'a>,
    roots: HashMap<TypeId, SchemaFragment>,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(registry: &'a CodecRegistry) -> Self {
        Self {
            generator: SchemaGenerator::new(registry),
            roots: HashMap::new(),
        }
    }

    /// Documents `T` and returns its fragment. Repeated calls return the
    /// cached fragment.
    pub fn document<T: Describe + ?Sized>(&mut self) -> SchemaFragment {
        let type_id = TypeId::of::<T>();
        if let Some(fragment) = self.roots.get(&type_id) {
            return fragment.clone();
        }
        let fragment = self.generator.fragment_of::<T>();
        self.roots.insert(type_id, fragment.clone());
        fragment
    }

    /// Freezes the documented types into a read-only catalog.
    pub fn finish(self) -> Result<SchemaCatalog, SchemaError> {
        if let Some(name) = self.generator.conflicts.first().copied() {
            return Err(SchemaError::ConflictingComponent { name });
        }
        if let Some((component, field)) = self.generator.duplicate_fields.first() {
            return Err(SchemaError::DuplicateField {
                component: *component,
                field: field.clone(),
            });
        }

        debug!(
            components = self.generator.components.len(),
            roots = self.roots.len(),
            "schema catalog built"
        );

        Ok(SchemaCatalog {
            roots: self.roots,
            components: self.generator.components,
        })
    }
}

/// Read-only schema descriptions, built once per process.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    roots: HashMap<TypeId, SchemaFragment>,
    components: BTreeMap<&'static str, SchemaFragment>,
}

impl SchemaCatalog {
    /// The fragment documented for `T`, if it was documented.
    pub fn schema_of<T: ?Sized + 'static>(&self) -> Option<&SchemaFragment> {
        self.roots.get(&TypeId::of::<T>())
    }

    /// A named component.
    pub fn component(&self, name: &str) -> Option<&SchemaFragment> {
        self.components.get(name)
    }

    /// Follows a component reference; other fragments are returned as is.
    pub fn resolve<'c>(&'c self, fragment: &'c SchemaFragment) -> Option<&'c SchemaFragment> {
        match fragment {
            SchemaFragment::Reference(name) => self.component(name),
            other => Some(other),
        }
    }

    /// Component names, sorted.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.keys().copied()
    }

    /// Renders the catalog as an OpenAPI `components` section.
    pub fn to_json(&self) -> WireValue {
        let schemas: Map<String, WireValue> = self
            .components
            .iter()
            .map(|(name, fragment)| ((*name).to_owned(), fragment.to_json()))
            .collect();
        json!({"components": {"schemas": schemas}})
    }
}

// =============================================================================
// Built-in descriptions
// =============================================================================

impl Describe for bool {
    fn describe(_: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::Boolean
    }
}

macro_rules! describe_number {
    ($variant:ident, $format:literal: $($t:ty),*) => {
        $(
            impl Describe for $t {
                fn describe(_: &mut SchemaGenerator<'_>) -> SchemaFragment {
                    SchemaFragment::$variant { format: $format }
                }
            }
        )*
    };
}

describe_number!(Integer, "int32": i8, i16, i32, u8, u16);
describe_number!(Integer, "int64": i64, isize, u32, u64, usize);
describe_number!(Number, "float": f32);
describe_number!(Number, "double": f64);

impl Describe for str {
    fn describe(_: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::String { format: None }
    }
}

impl Describe for String {
    fn describe(_: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::String { format: None }
    }
}

impl Describe for WireValue {
    fn describe(_: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::Any
    }
}

impl Describe for DateTime<Utc> {
    fn describe(_: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::String {
            format: Some("date-time"),
        }
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
        schema.fragment_of::<T>()
    }
}

impl<T: Describe + ?Sized> Describe for RefCell<T> {
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
        schema.fragment_of::<T>()
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::Nullable(Box::new(schema.fragment_of::<T>()))
    }
}

impl<T: Describe> Describe for [T] {
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::Array(Box::new(schema.fragment_of::<T>()))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::Array(Box::new(schema.fragment_of::<T>()))
    }
}

impl<T: Describe> Describe for BTreeMap<String, T> {
    fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
        SchemaFragment::Map(Box::new(schema.fragment_of::<T>()))
    }
}

macro_rules! describe_shared {
    ($($handle:ident)::+) => {
        impl<T: Describe + ?Sized> Describe for $($handle)::+<T> {
            fn describe(schema: &mut SchemaGenerator<'_>) -> SchemaFragment {
                SchemaFragment::Shared(Box::new(schema.fragment_of::<T>()))
            }
        }
    };
}

describe_shared!(Rc);
describe_shared!(Arc);
describe_shared!(rc::Weak);
describe_shared!(sync::Weak);
