//! Macros for declaring wire types.

/// Wires identifier types into [`Encode`](crate::Encode) and
/// [`Describe`](crate::Describe).
///
/// Identifiers encode through the walker's registry and describe themselves
/// as `{"type": "string", "format": "<kind>"}`.
#[macro_export]
macro_rules! impl_wire_identifier {
    ($($id:ty),* $(,)?) => {
        $(
            impl $crate::Encode for $id {
                fn encode(&self, walker: &mut $crate::GraphWalker<'_>) -> $crate::WireValue {
                    walker.identifier(self)
                }
            }

            impl $crate::Describe for $id {
                fn describe(schema: &mut $crate::SchemaGenerator<'_>) -> $crate::SchemaFragment {
                    schema.identifier::<$id>()
                }
            }
        )*
    };
}

/// Declares a response struct and derives its wire encoding and schema.
///
/// Fields are written in declaration order under their lower snake case
/// names. The struct is documented as a component named after the type; two
/// fields sharing a wire name fail [`SchemaIntrospector::finish`](crate::SchemaIntrospector::finish).
///
/// # Example
///
/// ```ignore
/// define_wire_object! {
///     #[derive(Debug)]
///     pub struct Item {
///         pub id: ItemId,
///         pub owning_case: Backref<Case>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_wire_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Encode for $name {
            fn encode(&self, walker: &mut $crate::GraphWalker<'_>) -> $crate::WireValue {
                walker.object(&[
                    $( (stringify!($field), &self.$field as &dyn $crate::Encode), )*
                ])
            }
        }

        impl $crate::Describe for $name {
            fn describe(schema: &mut $crate::SchemaGenerator<'_>) -> $crate::SchemaFragment {
                let fields = vec![
                    $( (stringify!($field), schema.fragment_of::<$ty>()), )*
                ];
                schema.object(fields)
            }

            fn component_name() -> Option<&'static str> {
                Some(stringify!($name))
            }
        }
    };
}

/// Declares a closed set of symbols written on the wire by name.
///
/// The wire symbol is the variant name under the field naming rule
/// (`Legendary` becomes `"legendary"`), never the ordinal.
#[macro_export]
macro_rules! define_wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),*];

            /// The declared symbol of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }

            /// The symbol written on the wire.
            #[must_use]
            pub fn wire_name(&self) -> String {
                $crate::naming::wire_name(self.as_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.wire_name())
            }
        }

        impl $crate::Encode for $name {
            fn encode(&self, _: &mut $crate::GraphWalker<'_>) -> $crate::WireValue {
                $crate::WireValue::String(self.wire_name())
            }
        }

        impl $crate::Describe for $name {
            fn describe(schema: &mut $crate::SchemaGenerator<'_>) -> $crate::SchemaFragment {
                schema.enumeration(&[$(stringify!($variant)),*])
            }

            fn component_name() -> Option<&'static str> {
                Some(stringify!($name))
            }
        }
    };
}
