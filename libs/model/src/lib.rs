//! # ruby-model
//!
//! Response types returned by the ruby API.
//!
//! Every type is declared through the `ruby-wire` macros, so it can be
//! serialized with a [`GraphSerializer`](ruby_wire::GraphSerializer) and
//! documented with a [`SchemaIntrospector`].
//!
//! ## Associations
//!
//! - A [`Case`] owns its [`Item`]s; each item points back to its case
//! - Items and cases share their [`ItemType`] / [`CaseType`]
//! - [`OutboxMessage`]s carry a bare ULID correlation id
//!
//! Back-references and repeated shared types are flattened to `null` on the
//! wire after their first occurrence in a document.

mod entities;
mod outbox;

pub use entities::*;
pub use outbox::*;

use ruby_wire::SchemaIntrospector;

/// Documents every response type.
pub fn document_all(introspector: &mut SchemaIntrospector<'_>) {
    introspector.document::<User>();
    introspector.document::<ItemType>();
    introspector.document::<Item>();
    introspector.document::<CaseType>();
    introspector.document::<Case>();
    introspector.document::<OutboxMessage>();
}
