//! # ruby-wire
//!
//! Turns ruby response graphs into JSON and describes their shape for API
//! documentation.
//!
//! ## Design Principles
//!
//! - Serialization and schema generation are driven by trait impls
//!   ([`Encode`], [`Describe`]) generated per type, not by runtime reflection
//! - Identifiers always travel as their canonical string, resolved through an
//!   explicit [`CodecRegistry`](ruby_id::CodecRegistry)
//! - Wire field names are lower snake case ([`naming::wire_name`]), and the
//!   schema uses the same rule so documented names match emitted names
//! - Shared objects (`Rc`, `Arc`, `Weak`) are emitted once per document; a
//!   repeated or cyclic reference is flattened to `null`
//!
//! ## Cycle Policy
//!
//! Self-referential fields are flattened to `null` on second encounter. The
//! policy is lossy: no back-reference token is written. See
//! [`ReferencePolicy`] for the two supported variants.

mod macros;

mod encode;
mod error;
mod ids;
pub mod naming;
mod schema;

pub use encode::{
    Backref, Encode, GraphSerializer, GraphWalker, ReferencePolicy, SerializerOptions, Shared,
    WireValue,
};
pub use error::{SchemaError, WireError};
pub use schema::{
    Describe, SchemaCatalog, SchemaFragment, SchemaGenerator, SchemaIntrospector,
    SHARED_REFERENCE_DESCRIPTION,
};
