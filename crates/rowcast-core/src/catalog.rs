//! Field catalogs.
//!
//! A [`FieldCatalog`] is the ordered list of columns for one record shape, each
//! with the [`Path`] that locates its leaf inside a record. Catalogs are built
//! once from a [`Shape`] by [`CatalogBuilder`] and are read-only afterwards, so
//! one catalog can serve any number of concurrent projections.
//!
//! ## Layout rules
//!
//! - Record fields appear in declaration order; nested names are joined with the
//!   separator (`Pet.Name`).
//! - Optionals do not add a path step. Absence is checked at projection time.
//! - Sequences expand to one block of columns per index (`Tags[0]`, `Tags[1]`).
//!   Fixed arrays use their length; variable sequences need a declared width.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rowcast_types::{Described, RecordType, Shape};
use tracing::debug;

use crate::error::{EncodeError, Result};

/// One step of a resolution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Descend into the record field at this position.
    Field(usize),
    /// Index into a sequence.
    Index(usize),
}

/// Resolution path of a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Step>);

impl Path {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    /// `.0[2].1` style: fields by position, sequence indices in brackets.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            match step {
                Step::Field(k) => write!(f, ".{}", k)?,
                Step::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

/// A named output position plus its resolution path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    names: Vec<String>,
    path: Path,
}

impl Column {
    pub fn new(names: Vec<String>, path: Path) -> Self {
        Self { names, path }
    }

    /// Header cell text (the first name).
    pub fn display_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    /// Every name this column answers to, header first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered columns for one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    record_type: RecordType,
    columns: Vec<Column>,
}

impl FieldCatalog {
    pub fn new(record_type: RecordType, columns: Vec<Column>) -> Self {
        Self {
            record_type,
            columns,
        }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header row (display names in column order).
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.display_name().to_string())
            .collect()
    }

    /// Column whose names include `name`.
    pub fn find(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.names.iter().any(|n| n == name))
    }
}

/// Options controlling column layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogOptions {
    /// Joins nested field names (`Pet.Name`)
    pub separator: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
        }
    }
}

/// Flattens a record shape into a [`FieldCatalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    options: CatalogOptions,
}

impl CatalogBuilder {
    pub fn new(options: CatalogOptions) -> Self {
        Self { options }
    }

    /// Build the catalog for `shape`, which must be a record (optionally wrapped
    /// in optionals).
    pub fn build(&self, shape: &Shape) -> Result<FieldCatalog> {
        let record = shape.as_record().ok_or_else(|| {
            EncodeError::unsupported(format!(
                "only records can be laid out as rows, found {}",
                shape.unwrap_optional().kind_name()
            ))
        })?;

        let mut columns = Vec::new();
        let mut steps = Vec::new();
        self.visit(shape, &[], &mut steps, &mut columns)?;

        debug!(
            record_type = %record.record_type,
            columns = columns.len(),
            "built field catalog"
        );
        Ok(FieldCatalog::new(record.record_type.clone(), columns))
    }

    fn visit(
        &self,
        shape: &Shape,
        names: &[String],
        steps: &mut Vec<Step>,
        columns: &mut Vec<Column>,
    ) -> Result<()> {
        match shape {
            Shape::Optional(inner) => self.visit(inner, names, steps, columns),
            Shape::Scalar(_) => {
                columns.push(Column::new(names.to_vec(), Path::new(steps.clone())));
                Ok(())
            }
            Shape::Record(record) => {
                for (position, field) in record.fields.iter().enumerate() {
                    let nested = self.join(names, &field.names);
                    steps.push(Step::Field(position));
                    self.visit(&field.shape, &nested, steps, columns)?;
                    steps.pop();
                }
                Ok(())
            }
            Shape::Sequence { element, len } => {
                let width = len.columns().ok_or_else(|| {
                    EncodeError::unsupported(
                        "variable-length sequence has no declared column width",
                    )
                    .in_column(names.first().map(String::as_str).unwrap_or_default())
                })?;
                for index in 0..width {
                    let indexed: Vec<String> =
                        names.iter().map(|n| format!("{}[{}]", n, index)).collect();
                    steps.push(Step::Index(index));
                    self.visit(element, &indexed, steps, columns)?;
                    steps.pop();
                }
                Ok(())
            }
        }
    }

    /// Prefix each child name with the parent's header name.
    fn join(&self, parent: &[String], child: &[String]) -> Vec<String> {
        match parent.first() {
            None => child.to_vec(),
            Some(prefix) => child
                .iter()
                .map(|c| format!("{}{}{}", prefix, self.options.separator, c))
                .collect(),
        }
    }
}

type CatalogKey = (RecordType, CatalogOptions);

static CATALOGS: LazyLock<RwLock<HashMap<CatalogKey, Arc<FieldCatalog>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Catalog of a static type, built on first request and cached per process.
pub fn catalog_for<T: Described + ?Sized>(options: &CatalogOptions) -> Result<Arc<FieldCatalog>> {
    let key = (T::described_type(), options.clone());
    if let Some(catalog) = CATALOGS.read().get(&key) {
        return Ok(Arc::clone(catalog));
    }

    let catalog = Arc::new(CatalogBuilder::new(options.clone()).build(&T::describe())?);
    let mut cache = CATALOGS.write();
    // Another thread may have won the race; keep whichever landed first.
    let entry = cache.entry(key).or_insert(catalog);
    Ok(Arc::clone(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_types::{FieldShape, RecordShape, ScalarKind, SequenceLen};

    fn text() -> Shape {
        Shape::Scalar(ScalarKind::Text)
    }

    fn pet_shape() -> Shape {
        Shape::Record(RecordShape::new(
            RecordType::new("Pet"),
            vec![FieldShape::new("Name", text())],
        ))
    }

    fn person_shape() -> Shape {
        Shape::Record(RecordShape::new(
            RecordType::new("Person"),
            vec![
                FieldShape::new("Name", text()),
                FieldShape::new("Age", Shape::Scalar(ScalarKind::UInt)),
                FieldShape::new("Pet", Shape::optional(pet_shape())),
            ],
        ))
    }

    #[test]
    fn test_nested_fields_flatten_in_order() {
        let catalog = CatalogBuilder::default().build(&person_shape()).unwrap();
        assert_eq!(catalog.header(), vec!["Name", "Age", "Pet.Name"]);
        assert_eq!(catalog.record_type(), &RecordType::new("Person"));

        let paths: Vec<&[Step]> = catalog.columns().iter().map(|c| c.path().steps()).collect();
        assert_eq!(
            paths,
            vec![
                &[Step::Field(0)][..],
                &[Step::Field(1)][..],
                &[Step::Field(2), Step::Field(0)][..],
            ]
        );
    }

    #[test]
    fn test_sequences_expand_per_index() {
        let shape = Shape::Record(RecordShape::new(
            RecordType::new("Owner"),
            vec![
                FieldShape::new("Tags", Shape::sequence(text(), SequenceLen::Fixed(3))),
                FieldShape::new(
                    "Pets",
                    Shape::sequence(
                        Shape::optional(pet_shape()),
                        SequenceLen::Variable { columns: Some(2) },
                    ),
                ),
            ],
        ));
        let catalog = CatalogBuilder::default().build(&shape).unwrap();
        assert_eq!(
            catalog.header(),
            vec!["Tags[0]", "Tags[1]", "Tags[2]", "Pets[0].Name", "Pets[1].Name"]
        );
        let (_, column) = catalog.find("Pets[1].Name").unwrap();
        assert_eq!(
            column.path().steps(),
            &[Step::Field(1), Step::Index(1), Step::Field(0)]
        );
        assert_eq!(column.path().to_string(), ".1[1].0");
    }

    #[test]
    fn test_undeclared_width_is_unsupported() {
        let shape = Shape::Record(RecordShape::new(
            RecordType::new("Post"),
            vec![FieldShape::new(
                "Tags",
                Shape::sequence(text(), SequenceLen::Variable { columns: None }),
            )],
        ));
        let err = CatalogBuilder::default().build(&shape).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::UnsupportedShape { column: Some(ref c), .. } if c == "Tags"
        ));
    }

    #[test]
    fn test_non_record_root_is_unsupported() {
        let err = CatalogBuilder::default().build(&text()).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedShape { .. }));
    }

    #[test]
    fn test_optional_root_is_accepted() {
        let catalog = CatalogBuilder::default()
            .build(&Shape::optional(person_shape()))
            .unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_aliases_and_custom_separator() {
        let shape = Shape::Record(RecordShape::new(
            RecordType::new("Person"),
            vec![FieldShape::new(
                "Pet",
                Shape::Record(RecordShape::new(
                    RecordType::new("Pet"),
                    vec![FieldShape::new("Name", text()).with_alias("name")],
                )),
            )
            .with_alias("pet")],
        ));
        let builder = CatalogBuilder::new(CatalogOptions {
            separator: "_".to_string(),
        });
        let catalog = builder.build(&shape).unwrap();
        let column = &catalog.columns()[0];
        assert_eq!(column.display_name(), "Pet_Name");
        assert_eq!(column.names(), &["Pet_Name".to_string(), "Pet_name".to_string()]);
        assert!(catalog.find("Pet_name").is_some());
    }

    #[test]
    fn test_catalog_for_is_cached() {
        struct Marker;
        impl Described for Marker {
            fn describe() -> Shape {
                Shape::Record(RecordShape::new(
                    RecordType::of::<Marker>(),
                    vec![FieldShape::new("Id", Shape::Scalar(ScalarKind::UInt))],
                ))
            }
        }

        let options = CatalogOptions::default();
        let first = catalog_for::<Marker>(&options).unwrap();
        let second = catalog_for::<Marker>(&options).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = catalog_for::<Marker>(&CatalogOptions {
            separator: "/".to_string(),
        })
        .unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
