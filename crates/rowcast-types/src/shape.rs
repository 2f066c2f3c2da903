//! Static structure of records.
//!
//! A [`Shape`] is the build-time description of a type: which fields a record has,
//! which of them are optional, and how wide each repeated field is. Catalogs are
//! derived from shapes once and never consult a type again.

use std::fmt;
use std::sync::Arc;

/// Identity of a record type.
///
/// Static Rust types use their `std::any::type_name`; dynamic records carry
/// whatever name the caller assigned when building them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordType(Arc<str>);

impl RecordType {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Identity of a static Rust type.
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Text,
    Timestamp,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Char => "char",
            ScalarKind::Text => "text",
            ScalarKind::Timestamp => "timestamp",
        }
    }
}

/// Length of a repeated field, as far as the column layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceLen {
    /// Fixed-size array; always this many columns.
    Fixed(usize),
    /// Growable sequence. `columns` is the number of element blocks to lay out;
    /// `None` means nobody declared a width yet.
    Variable { columns: Option<usize> },
}

impl SequenceLen {
    /// Number of element blocks the catalog should emit, if known.
    pub fn columns(&self) -> Option<usize> {
        match self {
            SequenceLen::Fixed(n) => Some(*n),
            SequenceLen::Variable { columns } => *columns,
        }
    }
}

/// Structural description of a type.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Scalar(ScalarKind),
    /// A value that may be absent (`Option<T>`, a null JSON value).
    Optional(Box<Shape>),
    Sequence {
        element: Box<Shape>,
        len: SequenceLen,
    },
    Record(RecordShape),
}

impl Shape {
    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    pub fn sequence(element: Shape, len: SequenceLen) -> Self {
        Shape::Sequence {
            element: Box::new(element),
            len,
        }
    }

    /// Declare how many element blocks a variable-length sequence lays out.
    ///
    /// Looks through optional wrappers. Fixed arrays and non-sequences are
    /// returned unchanged.
    pub fn with_columns(self, columns: usize) -> Self {
        match self {
            Shape::Optional(inner) => Shape::Optional(Box::new(inner.with_columns(columns))),
            Shape::Sequence {
                element,
                len: SequenceLen::Variable { .. },
            } => Shape::Sequence {
                element,
                len: SequenceLen::Variable {
                    columns: Some(columns),
                },
            },
            other => other,
        }
    }

    /// Strip every layer of optionality.
    pub fn unwrap_optional(&self) -> &Shape {
        let mut shape = self;
        while let Shape::Optional(inner) = shape {
            shape = inner;
        }
        shape
    }

    /// The record behind this shape, looking through optionals.
    pub fn as_record(&self) -> Option<&RecordShape> {
        match self.unwrap_optional() {
            Shape::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Scalar(kind) => kind.name(),
            Shape::Optional(_) => "optional",
            Shape::Sequence { .. } => "sequence",
            Shape::Record(_) => "record",
        }
    }
}

/// Fields of a record, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    pub record_type: RecordType,
    pub fields: Vec<FieldShape>,
}

impl RecordShape {
    pub fn new(record_type: RecordType, fields: Vec<FieldShape>) -> Self {
        Self {
            record_type,
            fields,
        }
    }

    /// Position of the field whose names include `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.names.iter().any(|n| n == name))
    }
}

/// One field of a record.
///
/// A field may answer to several names; the first one is the column header.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    pub names: Vec<String>,
    pub shape: Shape,
}

impl FieldShape {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            names: vec![name.into()],
            shape,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.names.push(alias.into());
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.shape = self.shape.with_columns(columns);
        self
    }

    pub fn first_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_columns_looks_through_optionals() {
        let shape = Shape::optional(Shape::sequence(
            Shape::Scalar(ScalarKind::Text),
            SequenceLen::Variable { columns: None },
        ));
        let declared = shape.with_columns(3);
        match declared.unwrap_optional() {
            Shape::Sequence { len, .. } => assert_eq!(len.columns(), Some(3)),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_with_columns_keeps_fixed_arrays() {
        let shape = Shape::sequence(Shape::Scalar(ScalarKind::Int), SequenceLen::Fixed(2));
        assert_eq!(shape.clone().with_columns(5), shape);
    }

    #[test]
    fn test_record_position_matches_aliases() {
        let record = RecordShape::new(
            RecordType::new("Person"),
            vec![
                FieldShape::new("Name", Shape::Scalar(ScalarKind::Text)).with_alias("name"),
                FieldShape::new("Age", Shape::Scalar(ScalarKind::UInt)),
            ],
        );
        assert_eq!(record.position("name"), Some(0));
        assert_eq!(record.position("Age"), Some(1));
        assert_eq!(record.position("Pet"), None);
    }
}
