//! Row projector.
//!
//! Walks each column's [`Path`](crate::catalog::Path) against a record one step at
//! a time and writes the leaf's text into the matching cell. Absence is checked
//! before every step: a `None` optional anywhere along the path, or an index past
//! the end of a sequence, ends resolution with an empty cell. Only a disagreement
//! between the record and the catalog is an error.
//!
//! The projector holds no state. Any number of threads may project against the
//! same catalog as long as each brings its own [`Row`].

use rowcast_types::{Reflect, Reflected};
use tracing::trace;

use crate::catalog::{FieldCatalog, Step};
use crate::error::{EncodeError, Result};

/// One record's cells, in catalog order.
pub type Row = Vec<String>;

/// Project `record` into a freshly allocated row.
pub fn project(record: &dyn Reflect, catalog: &FieldCatalog) -> Result<Row> {
    let mut row = Row::with_capacity(catalog.len());
    project_into(record, catalog, &mut row)?;
    Ok(row)
}

/// Project `record` into `row`, reusing its cells' allocations.
///
/// On return `row.len() == catalog.len()`. If an error is returned the row's
/// contents are unspecified.
pub fn project_into(record: &dyn Reflect, catalog: &FieldCatalog, row: &mut Row) -> Result<()> {
    row.resize_with(catalog.len(), String::new);
    for (cell, column) in row.iter_mut().zip(catalog.columns()) {
        cell.clear();
        resolve(record, column.path().steps(), cell)
            .map_err(|e| e.in_column(column.display_name()))?;
    }
    trace!(record_type = %catalog.record_type(), cells = row.len(), "projected row");
    Ok(())
}

/// Resolve `steps` against `value`, appending the leaf's text to `cell`.
fn resolve(value: &dyn Reflect, steps: &[Step], cell: &mut String) -> Result<()> {
    let mut current = value;
    let mut remaining = steps;
    loop {
        match current.reflect() {
            Reflected::Absent => return Ok(()),
            Reflected::Scalar(scalar) => {
                if let Some(step) = remaining.first() {
                    return Err(EncodeError::shape_mismatch(format!(
                        "cannot apply {:?} to a {} value",
                        step,
                        scalar.kind().name()
                    )));
                }
                return scalar
                    .write_text(cell)
                    .map_err(|_| EncodeError::unsupported("leaf value failed to format"));
            }
            Reflected::Record(record) => {
                let Some((step, rest)) = remaining.split_first() else {
                    return Err(EncodeError::unsupported(format!(
                        "path ends on record {} instead of a leaf",
                        record.record_type()
                    )));
                };
                let Step::Field(position) = *step else {
                    return Err(EncodeError::shape_mismatch(format!(
                        "cannot apply {:?} to record {}",
                        step,
                        record.record_type()
                    )));
                };
                current = record.field(position).ok_or_else(|| {
                    EncodeError::shape_mismatch(format!(
                        "record {} has {} fields, no field at position {}",
                        record.record_type(),
                        record.field_count(),
                        position
                    ))
                })?;
                remaining = rest;
            }
            Reflected::Sequence(sequence) => {
                let Some((step, rest)) = remaining.split_first() else {
                    return Err(EncodeError::unsupported(
                        "path ends on a sequence instead of a leaf",
                    ));
                };
                let Step::Index(index) = *step else {
                    return Err(EncodeError::shape_mismatch(format!(
                        "cannot apply {:?} to a sequence",
                        step
                    )));
                };
                if index >= sequence.len() {
                    return Ok(());
                }
                current = sequence.element(index).ok_or_else(|| {
                    EncodeError::shape_mismatch(format!(
                        "sequence of length {} has no element {}",
                        sequence.len(),
                        index
                    ))
                })?;
                remaining = rest;
            }
        }
    }
}
