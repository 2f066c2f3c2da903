//! Incremental encoder: one record per call.
//!
//! An [`Encoder`] is bound to one record type for its whole life. Each
//! [`Encoder::encode`] call projects, writes, and flushes a single row, so output
//! is durable record by record. The encoder owns one row buffer and one writer
//! cursor; callers sharing it across threads must serialize access.

use std::sync::Arc;

use rowcast_types::{Described, RecordType, Tabular};
use tracing::warn;

use crate::catalog::{catalog_for, CatalogOptions, FieldCatalog};
use crate::error::{EncodeError, Result};
use crate::metrics::EncodeMetrics;
use crate::projector::{project_into, Row};
use crate::writer::RowWriter;

pub struct Encoder<W: RowWriter> {
    writer: W,
    record_type: RecordType,
    catalog: Arc<FieldCatalog>,
    row: Row,
    metrics: Option<EncodeMetrics>,
}

impl<W: RowWriter> Encoder<W> {
    /// Encoder for records of type `T` (or `Option<T>`, `Box<T>`).
    pub fn new<T: Described + ?Sized>(writer: W) -> Result<Self> {
        Self::with_options::<T>(writer, &CatalogOptions::default())
    }

    pub fn with_options<T: Described + ?Sized>(writer: W, options: &CatalogOptions) -> Result<Self> {
        let catalog = catalog_for::<T>(options)?;
        Ok(Self::with_catalog(writer, T::described_type(), catalog))
    }

    /// Encoder over a prebuilt catalog, e.g. one built from a dynamic record.
    pub fn with_catalog(writer: W, record_type: RecordType, catalog: Arc<FieldCatalog>) -> Self {
        let row = vec![String::new(); catalog.len()];
        Self {
            writer,
            record_type,
            catalog,
            row,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: EncodeMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Write the column display names as one row.
    ///
    /// Not flushed on its own; the next `encode` flushes it. Calling this twice
    /// writes the header twice.
    pub fn write_header(&mut self) -> Result<()> {
        for (cell, column) in self.row.iter_mut().zip(self.catalog.columns()) {
            cell.clear();
            cell.push_str(column.display_name());
        }
        self.writer.write_row(&self.row)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_header();
        }
        Ok(())
    }

    /// Project, write, and flush one record.
    ///
    /// Fails with [`EncodeError::TypeMismatch`] before writing anything if
    /// `record` is not of the encoder's type.
    pub fn encode<R: Tabular>(&mut self, record: &R) -> Result<()> {
        let got = record.row_type();
        if got != self.record_type {
            warn!(expected = %self.record_type, got = %got, "rejecting record of another type");
            self.note_failure();
            return Err(EncodeError::TypeMismatch {
                expected: self.record_type.clone(),
                got,
            });
        }

        let result = self.write_record(record);
        if result.is_err() {
            self.note_failure();
        }
        result
    }

    fn write_record<R: Tabular>(&mut self, record: &R) -> Result<()> {
        project_into(record, &self.catalog, &mut self.row)?;
        self.writer.write_row(&self.row)?;
        self.writer.flush()?;
        if let Some(err) = self.writer.last_error() {
            return Err(EncodeError::Writer(err));
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_row(&self.row);
        }
        Ok(())
    }

    fn note_failure(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_failure();
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
