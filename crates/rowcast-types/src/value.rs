//! Dynamic records.
//!
//! [`Value`] covers records whose shape is only known once the first one shows
//! up, typically JSON read from a file or a pipe. Its shape is inferred from an
//! instance, and later instances can be laid out in that shape with
//! [`Value::conform_json`] so every record projects against the same catalog.

use std::borrow::Cow;

use serde_json::Value as JsonValue;

use crate::reflect::{RecordAccess, Reflect, Reflected, Tabular};
use crate::scalar::Scalar;
use crate::shape::{FieldShape, RecordShape, RecordType, ScalarKind, SequenceLen, Shape};

/// A dynamically shaped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Record(DynRecord),
}

/// A record with named fields kept in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct DynRecord {
    record_type: RecordType,
    fields: Vec<(String, Value)>,
}

impl DynRecord {
    pub fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Whether this record holds the fields of `layout`, in the same order and
    /// each under one of its names, with values that fit the field shapes.
    pub fn fits(&self, layout: &RecordShape) -> bool {
        self.fields.len() == layout.fields.len()
            && self
                .fields
                .iter()
                .zip(&layout.fields)
                .all(|((name, value), field)| {
                    field.names.iter().any(|n| n == name) && value.fits(&field.shape)
                })
    }

    /// Inferred record shape.
    pub fn shape(&self) -> RecordShape {
        RecordShape::new(
            self.record_type.clone(),
            self.fields
                .iter()
                .map(|(name, value)| FieldShape::new(name.clone(), value.shape()))
                .collect(),
        )
    }
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Shape inferred from this instance.
    ///
    /// Lists lay out as many element blocks as they hold, using the first
    /// element's shape. Nulls (and empty lists' elements) are optional text.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Null => Shape::optional(Shape::Scalar(ScalarKind::Text)),
            Value::Bool(_) => Shape::Scalar(ScalarKind::Bool),
            Value::Int(_) => Shape::Scalar(ScalarKind::Int),
            Value::UInt(_) => Shape::Scalar(ScalarKind::UInt),
            Value::Float(_) => Shape::Scalar(ScalarKind::Float),
            Value::Text(_) => Shape::Scalar(ScalarKind::Text),
            Value::List(items) => Shape::sequence(
                items
                    .first()
                    .map(Value::shape)
                    .unwrap_or_else(|| Shape::optional(Shape::Scalar(ScalarKind::Text))),
                SequenceLen::Variable {
                    columns: Some(items.len()),
                },
            ),
            Value::Record(record) => Shape::Record(record.shape()),
        }
    }

    /// Whether every path laid out for `shape` resolves against this value
    /// without a structural disagreement.
    ///
    /// Nulls fit anywhere. Lists may be of any length; only the elements that
    /// have columns are checked.
    pub fn fits(&self, shape: &Shape) -> bool {
        match (self, shape.unwrap_optional()) {
            (Value::Null, _) => true,
            (Value::Record(record), Shape::Record(layout)) => record.fits(layout),
            (Value::List(items), Shape::Sequence { element, len }) => items
                .iter()
                .take(len.columns().unwrap_or(items.len()))
                .all(|item| item.fits(element)),
            (Value::Record(_) | Value::List(_), _) => false,
            (_, Shape::Scalar(_)) => true,
            _ => false,
        }
    }

    /// Convert JSON into a value. Objects become records named `record_type`;
    /// nested objects are named after their path (`Order.customer`,
    /// `Order.items[]`).
    pub fn from_json(record_type: RecordType, json: &JsonValue) -> Value {
        match json {
            JsonValue::Object(map) => {
                let mut record = DynRecord::new(record_type.clone());
                for (key, value) in map {
                    let nested = RecordType::new(format!("{}.{}", record_type, key));
                    record.push(key.clone(), Value::from_json(nested, value));
                }
                Value::Record(record)
            }
            JsonValue::Array(items) => {
                let element = RecordType::new(format!("{}[]", record_type));
                Value::List(
                    items
                        .iter()
                        .map(|item| Value::from_json(element.clone(), item))
                        .collect(),
                )
            }
            other => scalar_from_json(other),
        }
    }

    /// Lay `json` out in `shape`.
    ///
    /// Record fields are looked up by name (any alias): a missing key becomes
    /// `Null`, keys the shape does not know are dropped. Composite JSON found where
    /// the shape expects a scalar is kept as compact JSON text. Any other
    /// disagreement is carried through unchanged and surfaces at projection.
    pub fn conform_json(shape: &Shape, json: &JsonValue) -> Value {
        match (shape, json) {
            (_, JsonValue::Null) => Value::Null,
            (Shape::Optional(inner), _) => Value::conform_json(inner, json),
            (Shape::Record(record), JsonValue::Object(map)) => {
                let mut out = DynRecord::new(record.record_type.clone());
                for field in &record.fields {
                    let value = field
                        .names
                        .iter()
                        .find_map(|name| map.get(name))
                        .map(|v| Value::conform_json(&field.shape, v))
                        .unwrap_or(Value::Null);
                    out.push(field.first_name(), value);
                }
                Value::Record(out)
            }
            (Shape::Sequence { element, .. }, JsonValue::Array(items)) => Value::List(
                items
                    .iter()
                    .map(|item| Value::conform_json(element, item))
                    .collect(),
            ),
            (Shape::Scalar(_), JsonValue::Object(_) | JsonValue::Array(_)) => {
                Value::Text(json.to_string())
            }
            (Shape::Record(record), _) => Value::from_json(record.record_type.clone(), json),
            (_, other) => Value::from_json(RecordType::new("value"), other),
        }
    }
}

fn scalar_from_json(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::Text(s.clone()),
        composite => Value::Text(composite.to_string()),
    }
}

impl Reflect for Value {
    fn reflect(&self) -> Reflected<'_> {
        match self {
            Value::Null => Reflected::Absent,
            Value::Bool(b) => Reflected::Scalar(Scalar::Bool(*b)),
            Value::Int(n) => Reflected::Scalar(Scalar::Int(*n)),
            Value::UInt(n) => Reflected::Scalar(Scalar::UInt(*n)),
            Value::Float(x) => Reflected::Scalar(Scalar::Float(*x)),
            Value::Text(s) => Reflected::Scalar(Scalar::Text(Cow::Borrowed(s.as_str()))),
            Value::List(items) => Reflected::Sequence(items),
            Value::Record(record) => Reflected::Record(record),
        }
    }
}

impl Tabular for Value {
    fn row_type(&self) -> RecordType {
        match self {
            Value::Record(record) => record.record_type.clone(),
            other => RecordType::new(other.kind_name()),
        }
    }

    fn row_shape(&self) -> Shape {
        self.shape()
    }

    fn fits_layout(&self, layout: &Shape) -> bool {
        self.fits(layout)
    }
}

impl Reflect for DynRecord {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Record(self)
    }
}

impl RecordAccess for DynRecord {
    fn record_type(&self) -> RecordType {
        self.record_type.clone()
    }

    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn field(&self, position: usize) -> Option<&dyn Reflect> {
        self.fields.get(position).map(|(_, v)| v as &dyn Reflect)
    }
}

impl Tabular for DynRecord {
    fn row_type(&self) -> RecordType {
        self.record_type.clone()
    }

    fn row_shape(&self) -> Shape {
        Shape::Record(self.shape())
    }

    fn fits_layout(&self, layout: &Shape) -> bool {
        layout.as_record().is_some_and(|record| self.fits(record))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DynRecord> for Value {
    fn from(record: DynRecord) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_key_order() {
        let value = Value::from_json(
            RecordType::new("Person"),
            &json!({"Name": "Ana", "Age": 30, "Pet": null}),
        );
        let Value::Record(record) = value else {
            panic!("expected record");
        };
        let names: Vec<&str> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Name", "Age", "Pet"]);
        assert_eq!(record.get("Age"), Some(&Value::Int(30)));
        assert_eq!(record.get("Pet"), Some(&Value::Null));
    }

    #[test]
    fn test_shape_inference_uses_list_length() {
        let value = Value::from_json(RecordType::new("Post"), &json!({"Tags": ["a", "b", "c"]}));
        let shape = value.shape();
        let record = shape.as_record().unwrap();
        match &record.fields[0].shape {
            Shape::Sequence { element, len } => {
                assert_eq!(**element, Shape::Scalar(ScalarKind::Text));
                assert_eq!(len.columns(), Some(3));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_conform_json_fills_missing_and_drops_extra() {
        let first = Value::from_json(RecordType::new("Person"), &json!({"Name": "Ana", "Age": 30}));
        let shape = first.shape();
        let later = Value::conform_json(&shape, &json!({"Age": 5, "Nick": "b", "Name": "Bo"}));
        let Value::Record(record) = later else {
            panic!("expected record");
        };
        assert_eq!(
            record.fields(),
            &[
                ("Name".to_string(), Value::Text("Bo".to_string())),
                ("Age".to_string(), Value::Int(5)),
            ]
        );

        let sparse = Value::conform_json(&shape, &json!({"Name": "Cy"}));
        let Value::Record(record) = sparse else {
            panic!("expected record");
        };
        assert_eq!(record.get("Age"), Some(&Value::Null));
    }

    #[test]
    fn test_conform_json_keeps_composites_as_text() {
        let first = Value::from_json(RecordType::new("Event"), &json!({"meta": null}));
        let later = Value::conform_json(&first.shape(), &json!({"meta": {"k": 1}}));
        let Value::Record(record) = later else {
            panic!("expected record");
        };
        assert_eq!(record.get("meta"), Some(&Value::Text("{\"k\":1}".to_string())));
    }

    #[test]
    fn test_null_reflects_absent() {
        assert!(matches!(Value::Null.reflect(), Reflected::Absent));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_row_type_of_record() {
        let record = DynRecord::new(RecordType::new("Pet")).with_field("Name", "Rex");
        let value = Value::from(record);
        assert_eq!(value.row_type(), RecordType::new("Pet"));
        assert_eq!(Value::Int(1).row_type(), RecordType::new("int"));
    }

    #[test]
    fn test_fits_checks_field_order_not_list_length() {
        let first = Value::from_json(
            RecordType::new("P"),
            &json!({"A": 1, "B": {"C": 2}, "T": ["x", "y"]}),
        );
        let layout = first.shape();
        assert!(first.fits(&layout));

        let shorter = Value::from_json(
            RecordType::new("P"),
            &json!({"A": 3, "B": null, "T": ["z"]}),
        );
        assert!(shorter.fits(&layout));

        let reordered = Value::from_json(
            RecordType::new("P"),
            &json!({"B": {"C": 2}, "A": 1, "T": []}),
        );
        assert!(!reordered.fits(&layout));

        let missing = Value::from_json(RecordType::new("P"), &json!({"A": 1, "B": null}));
        assert!(!missing.fits(&layout));

        let scalar_for_record = Value::from_json(
            RecordType::new("P"),
            &json!({"A": 1, "B": 5, "T": []}),
        );
        assert!(!scalar_for_record.fits(&layout));
    }
}
