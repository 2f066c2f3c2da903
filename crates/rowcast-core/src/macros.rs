//! Declaring record types.
//!
//! [`impl_tabular!`](crate::impl_tabular) implements `Reflect`, `RecordAccess`,
//! `Described`, and `Tabular` for a struct from a list of its fields:
//!
//! ```
//! use rowcast_core::{impl_tabular, catalog_for, CatalogOptions};
//!
//! struct Order {
//!     id: u64,
//!     customer: String,
//!     lines: Vec<String>,
//!     internal_note: String,
//! }
//!
//! impl_tabular!(Order {
//!     id => "Id" | "id",
//!     customer,
//!     lines => "Line" [2],
//! });
//!
//! let catalog = catalog_for::<Order>(&CatalogOptions::default()).unwrap();
//! assert_eq!(catalog.header(), vec!["Id", "customer", "Line[0]", "Line[1]"]);
//! ```
//!
//! - `field` alone uses the field's identifier as its column name.
//! - `=> "Name" | "alias"` sets the header name and any aliases.
//! - `[n]` declares how many element blocks a `Vec` field lays out.
//! - Fields left out of the list are not encoded.

#[macro_export]
macro_rules! impl_tabular {
    ($ty:ty {
        $(
            $field:ident
            $(=> $name:literal $(| $alias:literal)*)?
            $([$width:literal])?
        ),* $(,)?
    }) => {
        impl $crate::Reflect for $ty {
            fn reflect(&self) -> $crate::Reflected<'_> {
                $crate::Reflected::Record(self)
            }
        }

        impl $crate::RecordAccess for $ty {
            fn record_type(&self) -> $crate::RecordType {
                <$ty as $crate::Described>::described_type()
            }

            fn field_count(&self) -> usize {
                <[&str]>::len(&[$(::core::stringify!($field)),*])
            }

            fn field(&self, position: usize) -> ::core::option::Option<&dyn $crate::Reflect> {
                let fields: &[&dyn $crate::Reflect] = &[$(&self.$field),*];
                fields.get(position).copied()
            }
        }

        impl $crate::Described for $ty {
            fn describe() -> $crate::Shape {
                $crate::Shape::Record($crate::RecordShape::new(
                    <$ty as $crate::Described>::described_type(),
                    ::std::vec![$(
                        $crate::__tabular_field!(
                            $ty, $field $(=> $name $(| $alias)*)? $([$width])?
                        )
                    ),*],
                ))
            }
        }

        impl $crate::Tabular for $ty {
            fn row_type(&self) -> $crate::RecordType {
                <$ty as $crate::Described>::described_type()
            }

            fn row_shape(&self) -> $crate::Shape {
                <$ty as $crate::Described>::describe()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tabular_field {
    (@name $field:ident) => {
        ::core::stringify!($field)
    };
    (@name $field:ident $name:literal) => {
        $name
    };
    ($ty:ty, $field:ident $(=> $name:literal $(| $alias:literal)*)? $([$width:literal])?) => {{
        let field = $crate::FieldShape::new(
            $crate::__tabular_field!(@name $field $($name)?),
            $crate::shape_of(|record: &$ty| &record.$field),
        );
        $($(let field = field.with_alias($alias);)*)?
        $(let field = field.with_columns($width);)?
        field
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Described, RecordAccess, Reflect, Reflected, Shape, Tabular};

    struct Point {
        x: i32,
        y: i32,
        label: Option<String>,
    }

    crate::impl_tabular!(Point { x => "X", y => "Y" | "y", label });

    #[test]
    fn test_record_access_by_position() {
        let p = Point {
            x: 1,
            y: -2,
            label: None,
        };
        assert_eq!(p.field_count(), 3);
        assert!(matches!(p.field(1).map(|f| f.reflect()), Some(Reflected::Scalar(_))));
        assert!(matches!(p.field(2).map(|f| f.reflect()), Some(Reflected::Absent)));
        assert!(p.field(3).is_none());
    }

    #[test]
    fn test_describe_names_and_aliases() {
        let shape = Point::describe();
        let record = shape.as_record().unwrap();
        assert_eq!(record.fields[0].names, vec!["X"]);
        assert_eq!(record.fields[1].names, vec!["Y", "y"]);
        assert_eq!(record.fields[2].names, vec!["label"]);
        assert!(matches!(record.fields[2].shape, Shape::Optional(_)));
    }

    #[test]
    fn test_row_type_is_rust_type_name() {
        let p = Point {
            x: 0,
            y: 0,
            label: None,
        };
        assert!(p.row_type().name().ends_with("Point"));
        assert_eq!(p.row_type(), Point::described_type());
    }
}
