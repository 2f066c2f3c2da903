//! Runtime access to record values.
//!
//! [`Reflect`] is the only thing the projection engine knows about a value: is it
//! absent, a leaf, a record with positional fields, or a sequence with indexed
//! elements. Everything else (which Rust type it is, how it is stored) stays on
//! the implementor's side of this trait.
//!
//! | Rust type | Reflected as |
//! |-----------|--------------|
//! | integers, floats, `bool`, `char`, `String`, `str` | `Scalar` |
//! | `Option<T>` | `Absent` when `None`, otherwise whatever `T` is |
//! | `Box<T>`, `Arc<T>`, `&T` | whatever `T` is |
//! | `Vec<T>`, `VecDeque<T>`, `[T; N]` | `Sequence` |
//! | chrono `DateTime`, `NaiveDate`, `NaiveDateTime` | `Scalar` (RFC 3339 / ISO 8601 text) |
//!
//! Record types get their impls from `rowcast_core::impl_tabular!` or, for
//! records discovered at runtime, from [`crate::value::Value`].

use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::scalar::Scalar;
use crate::shape::{RecordType, ScalarKind, SequenceLen, Shape};

/// What a value looks like at runtime.
pub enum Reflected<'a> {
    /// A `None` optional. Resolves to an empty cell at any depth.
    Absent,
    Scalar(Scalar<'a>),
    Record(&'a dyn RecordAccess),
    Sequence(&'a dyn SequenceAccess),
}

/// Value-accessor capability.
pub trait Reflect {
    fn reflect(&self) -> Reflected<'_>;
}

/// Positional field access on a record.
pub trait RecordAccess {
    fn record_type(&self) -> RecordType;

    fn field_count(&self) -> usize;

    /// Field at `position` in declaration order.
    fn field(&self, position: usize) -> Option<&dyn Reflect>;
}

/// Indexed element access on a sequence.
pub trait SequenceAccess {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect>;
}

/// Static shape of a type.
pub trait Described {
    fn describe() -> Shape;

    /// Identity used to check that a record matches an encoder.
    ///
    /// Wrappers (`Option`, `Box`, `Arc`) report the identity of what they wrap.
    fn described_type() -> RecordType {
        RecordType::of::<Self>()
    }
}

/// A value that can be encoded as one row.
///
/// Unlike [`Described`], identity and shape come from the instance, which lets
/// dynamic records (whose shape is only known once one arrives) take part.
pub trait Tabular: Reflect {
    fn row_type(&self) -> RecordType;

    fn row_shape(&self) -> Shape;

    /// Whether this instance can be projected against a catalog built from
    /// `layout`, the shape of an earlier record of the same type.
    ///
    /// Types whose layout is fixed by the type itself keep the default.
    fn fits_layout(&self, _layout: &Shape) -> bool {
        true
    }
}

/// Shape of the field selected by `accessor`.
///
/// Used by `impl_tabular!` to learn a field's type from its name alone.
pub fn shape_of<R, F, A>(_accessor: A) -> Shape
where
    F: Described + ?Sized,
    A: for<'r> Fn(&'r R) -> &'r F,
{
    F::describe()
}

// =============================================================================
// Scalars
// =============================================================================

macro_rules! reflect_scalar {
    ($($ty:ty => $variant:ident($cast:ty), $kind:ident;)*) => {
        $(
            impl Reflect for $ty {
                fn reflect(&self) -> Reflected<'_> {
                    Reflected::Scalar(Scalar::$variant(*self as $cast))
                }
            }

            impl Described for $ty {
                fn describe() -> Shape {
                    Shape::Scalar(ScalarKind::$kind)
                }
            }
        )*
    };
}

reflect_scalar! {
    i8 => Int(i64), Int;
    i16 => Int(i64), Int;
    i32 => Int(i64), Int;
    i64 => Int(i64), Int;
    isize => Int(i64), Int;
    u8 => UInt(u64), UInt;
    u16 => UInt(u64), UInt;
    u32 => UInt(u64), UInt;
    u64 => UInt(u64), UInt;
    usize => UInt(u64), UInt;
    f32 => Float32(f32), Float;
    f64 => Float(f64), Float;
}

impl Reflect for bool {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Bool(*self))
    }
}

impl Described for bool {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Bool)
    }
}

impl Reflect for char {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Char(*self))
    }
}

impl Described for char {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Char)
    }
}

impl Reflect for String {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Text(Cow::Borrowed(self.as_str())))
    }
}

impl Described for String {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Text)
    }
}

impl Reflect for str {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Text(Cow::Borrowed(self)))
    }
}

impl Described for str {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Text)
    }
}

impl Reflect for Cow<'_, str> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Text(Cow::Borrowed(self.as_ref())))
    }
}

impl Described for Cow<'_, str> {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Text)
    }
}

impl<Tz> Reflect for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Text(Cow::Owned(self.to_rfc3339())))
    }
}

impl<Tz: TimeZone> Described for DateTime<Tz> {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Timestamp)
    }
}

impl Reflect for NaiveDateTime {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Text(Cow::Owned(
            self.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        )))
    }
}

impl Described for NaiveDateTime {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Timestamp)
    }
}

impl Reflect for NaiveDate {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Text(Cow::Owned(self.format("%Y-%m-%d").to_string())))
    }
}

impl Described for NaiveDate {
    fn describe() -> Shape {
        Shape::Scalar(ScalarKind::Timestamp)
    }
}

// =============================================================================
// Optionals and pointers
// =============================================================================

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Reflected<'_> {
        match self {
            Some(value) => value.reflect(),
            None => Reflected::Absent,
        }
    }
}

impl<T: Described> Described for Option<T> {
    fn describe() -> Shape {
        Shape::optional(T::describe())
    }

    fn described_type() -> RecordType {
        T::described_type()
    }
}

impl<T: Tabular + Described> Tabular for Option<T> {
    fn row_type(&self) -> RecordType {
        T::described_type()
    }

    fn row_shape(&self) -> Shape {
        Shape::optional(T::describe())
    }
}

macro_rules! reflect_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ptr<T> {
                fn reflect(&self) -> Reflected<'_> {
                    (**self).reflect()
                }
            }

            impl<T: Described + ?Sized> Described for $ptr<T> {
                fn describe() -> Shape {
                    T::describe()
                }

                fn described_type() -> RecordType {
                    T::described_type()
                }
            }

            impl<T: Tabular + ?Sized> Tabular for $ptr<T> {
                fn row_type(&self) -> RecordType {
                    (**self).row_type()
                }

                fn row_shape(&self) -> Shape {
                    (**self).row_shape()
                }

                fn fits_layout(&self, layout: &Shape) -> bool {
                    (**self).fits_layout(layout)
                }
            }
        )*
    };
}

reflect_pointer!(Box, Arc);

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Reflected<'_> {
        (**self).reflect()
    }
}

impl<T: Described + ?Sized> Described for &T {
    fn describe() -> Shape {
        T::describe()
    }

    fn described_type() -> RecordType {
        T::described_type()
    }
}

// =============================================================================
// Sequences
// =============================================================================

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Sequence(self)
    }
}

impl<T: Reflect> SequenceAccess for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|v| v as &dyn Reflect)
    }
}

impl<T: Described> Described for Vec<T> {
    fn describe() -> Shape {
        Shape::sequence(T::describe(), SequenceLen::Variable { columns: None })
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Sequence(self)
    }
}

impl<T: Reflect> SequenceAccess for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|v| v as &dyn Reflect)
    }
}

impl<T: Described> Described for VecDeque<T> {
    fn describe() -> Shape {
        Shape::sequence(T::describe(), SequenceLen::Variable { columns: None })
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Sequence(self)
    }
}

impl<T: Reflect, const N: usize> SequenceAccess for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|v| v as &dyn Reflect)
    }
}

impl<T: Described, const N: usize> Described for [T; N] {
    fn describe() -> Shape {
        Shape::sequence(T::describe(), SequenceLen::Fixed(N))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn text_of(value: &dyn Reflect) -> Option<String> {
        match value.reflect() {
            Reflected::Scalar(s) => Some(s.to_text()),
            _ => None,
        }
    }

    #[test]
    fn test_option_reflects_absent_or_inner() {
        let none: Option<u32> = None;
        assert!(matches!(none.reflect(), Reflected::Absent));
        assert_eq!(text_of(&Some(30u32)), Some("30".to_string()));
    }

    #[test]
    fn test_nested_option_is_transparent() {
        let value: Option<Box<Option<String>>> = Some(Box::new(None));
        assert!(matches!(value.reflect(), Reflected::Absent));
    }

    #[test]
    fn test_vec_reflects_sequence() {
        let tags = vec!["a".to_string(), "b".to_string()];
        match tags.reflect() {
            Reflected::Sequence(seq) => {
                assert_eq!(seq.len(), 2);
                assert_eq!(seq.element(1).and_then(text_of), Some("b".to_string()));
                assert!(seq.element(2).is_none());
            }
            _ => panic!("expected sequence"),
        }
    }

    #[test]
    fn test_array_describes_fixed_len() {
        assert_eq!(
            <[u8; 3]>::describe(),
            Shape::sequence(Shape::Scalar(ScalarKind::UInt), SequenceLen::Fixed(3))
        );
    }

    #[test]
    fn test_wrappers_report_inner_identity() {
        assert_eq!(<Option<String>>::described_type(), RecordType::of::<String>());
        assert_eq!(<Box<u64>>::described_type(), RecordType::of::<u64>());
    }

    #[test]
    fn test_timestamp_text_is_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(text_of(&ts), Some("2024-03-01T12:30:00+00:00".to_string()));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(text_of(&date), Some("2024-03-01".to_string()));
    }

    #[test]
    fn test_shape_of_reads_field_type() {
        struct Holder {
            tags: Vec<u16>,
        }
        let shape = shape_of(|h: &Holder| &h.tags);
        assert_eq!(
            shape,
            Shape::sequence(
                Shape::Scalar(ScalarKind::UInt),
                SequenceLen::Variable { columns: None }
            )
        );
    }
}
