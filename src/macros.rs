//! `capability!`: declare an accessor table plus the reader/writer traits
//! that dispatch through it.

/// Declare a capability: a const [`Capability`](crate::Capability) table,
/// a reader trait implemented for every [`AsView`](crate::AsView) and a
/// writer trait implemented for every [`AsViewBuilder`](crate::AsViewBuilder).
///
/// Each line binds one accessor:
///
/// ```text
/// getter, setter : Multiplicity Type => predicate IRI, datatype IRI (Option);
/// ```
///
/// `One` getters return `Result<Option<Type>>`, `Many` and `Ordered` getters
/// return `Result<Vec<Type>>`. Setters `set` a `One`, `add` a `Many` and
/// `add_ordered` an `Ordered` accessor.
///
/// ```rust
/// use std::sync::Arc;
/// use thing_rs::{capability, vocab, DatatypeRegistry, Interface, ViewBuilder};
///
/// capability! {
///     pub const HAS_NAME: HasName, HasNameBuilder {
///         name, set_name: One String => vocab::schema::NAME, None;
///         nicknames, add_nickname: Many String => "https://example.org/nick", None;
///     }
/// }
///
/// # fn example() -> thing_rs::Result<()> {
/// let interface = Arc::new(Interface::of(&[&HAS_NAME])?);
/// let view = ViewBuilder::new(interface, Arc::new(DatatypeRegistry::standard()))
///     .iri("https://example.org/ada")
///     .set_name("Ada")
///     .add_nickname("Countess")
///     .build()?;
///
/// assert_eq!(view.name()?, Some("Ada".to_string()));
/// assert_eq!(view.nicknames()?, vec!["Countess".to_string()]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[macro_export]
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $vis:vis const $cap:ident : $reader:ident, $writer:ident {
            $( $getter:ident, $setter:ident : $mult:ident $ty:ty => $predicate:expr, $datatype:expr );* $(;)?
        }
    ) => {
        $(#[$meta])*
        $vis const $cap: $crate::Capability = $crate::Capability {
            name: stringify!($cap),
            accessors: &[
                $(
                    $crate::Accessor {
                        name: stringify!($getter),
                        predicate: $predicate,
                        datatype: $datatype,
                        kind: <$ty as $crate::FromValue>::KIND,
                        multiplicity: $crate::Multiplicity::$mult,
                    },
                )*
            ],
        };

        $vis trait $reader: $crate::AsView {
            $( $crate::__accessor_getter!($mult $getter $ty); )*
        }

        impl<T: $crate::AsView + ?Sized> $reader for T {}

        $vis trait $writer: $crate::AsViewBuilder {
            $(
                fn $setter(&mut self, value: impl Into<$ty>) -> &mut Self {
                    let value: $ty = value.into();
                    $crate::AsViewBuilder::view_builder(self).put(stringify!($getter), value);
                    self
                }
            )*
        }

        impl<T: $crate::AsViewBuilder + ?Sized> $writer for T {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __accessor_getter {
    (One $getter:ident $ty:ty) => {
        fn $getter(&self) -> $crate::Result<Option<$ty>> {
            $crate::AsView::view(self).get(stringify!($getter))
        }
    };
    (Many $getter:ident $ty:ty) => {
        fn $getter(&self) -> $crate::Result<Vec<$ty>> {
            $crate::AsView::view(self).get_all(stringify!($getter))
        }
    };
    (Ordered $getter:ident $ty:ty) => {
        fn $getter(&self) -> $crate::Result<Vec<$ty>> {
            $crate::AsView::view(self).get_all(stringify!($getter))
        }
    };
}
