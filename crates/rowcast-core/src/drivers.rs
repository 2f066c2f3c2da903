//! Bulk and streaming drivers.
//!
//! These entry points need no prebuilt [`Encoder`](crate::encoder::Encoder):
//!
//! | Driver | Input | Catalog from | Flush |
//! |--------|-------|--------------|-------|
//! | [`encode_all`] | slice of records | element type | once, at the end |
//! | [`encode_source`] | blocking [`RecordSource`] | first record | once, at the end |
//! | [`encode_stream`] | async `Stream` | first record | once, at the end |
//! | [`encode_channel`] | tokio mpsc receiver | first record | once, at the end |
//!
//! A writer error aborts the remaining work and is returned unchanged. The
//! streaming drivers check every record after the first against the first
//! record's type and field layout and stop with `ShapeMismatch` on a stranger.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use rowcast_types::{Described, RecordType, Shape, Tabular};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::catalog::{catalog_for, CatalogBuilder, FieldCatalog};
use crate::config::EncodeOptions;
use crate::error::{EncodeError, Result};
use crate::projector::{project_into, Row};
use crate::source::RecordSource;
use crate::writer::RowWriter;

/// What a driver wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSummary {
    pub header_written: bool,
    /// Data rows, not counting the header
    pub rows_written: usize,
}

/// Encode every record of `records`, in order.
///
/// The catalog comes from `T` itself, so an empty slice still produces a header.
pub fn encode_all<W, T>(writer: &mut W, records: &[T], options: &EncodeOptions) -> Result<EncodeSummary>
where
    W: RowWriter + ?Sized,
    T: Tabular + Described,
{
    let catalog = catalog_for::<T>(&options.catalog)?;
    let mut batch = RowSink::new(writer, catalog, T::described_type(), options);
    let result = batch.write_all(records);
    batch.conclude(result)
}

/// Encode records from a blocking source until it closes.
///
/// The first record fixes the catalog. A source that closes before yielding
/// anything fails with [`EncodeError::EmptySource`] and writes nothing.
pub fn encode_source<W, S>(writer: &mut W, mut source: S, options: &EncodeOptions) -> Result<EncodeSummary>
where
    W: RowWriter + ?Sized,
    S: RecordSource,
    S::Item: Tabular,
{
    let Some(first) = source.recv() else {
        warn!("record source closed before the first record");
        return Err(EncodeError::EmptySource);
    };
    let mut sink = RowSink::from_first(writer, &first, options)?;
    let mut result = sink.start(&first);
    if result.is_ok() {
        while let Some(record) = source.recv() {
            if let Err(e) = sink.write_checked(&record) {
                result = Err(e);
                break;
            }
        }
    }
    sink.conclude(result)
}

/// Async counterpart of [`encode_source`].
///
/// Awaiting the next item is the only suspension point; projection and writing
/// run synchronously once a record arrives.
pub async fn encode_stream<W, S>(writer: &mut W, stream: S, options: &EncodeOptions) -> Result<EncodeSummary>
where
    W: RowWriter + ?Sized,
    S: Stream,
    S::Item: Tabular,
{
    futures::pin_mut!(stream);
    let Some(first) = stream.next().await else {
        warn!("record stream ended before the first record");
        return Err(EncodeError::EmptySource);
    };
    let mut sink = RowSink::from_first(writer, &first, options)?;
    let mut result = sink.start(&first);
    if result.is_ok() {
        while let Some(record) = stream.next().await {
            if let Err(e) = sink.write_checked(&record) {
                result = Err(e);
                break;
            }
        }
    }
    sink.conclude(result)
}

/// Encode everything sent on a tokio channel until all senders are dropped.
pub async fn encode_channel<W, T>(
    writer: &mut W,
    receiver: mpsc::Receiver<T>,
    options: &EncodeOptions,
) -> Result<EncodeSummary>
where
    W: RowWriter + ?Sized,
    T: Tabular,
{
    encode_stream(writer, ReceiverStream::new(receiver), options).await
}

/// Shared write loop: one catalog, one reusable row, one writer.
struct RowSink<'w, 'o, W: RowWriter + ?Sized> {
    writer: &'w mut W,
    catalog: Arc<FieldCatalog>,
    record_type: RecordType,
    /// Shape of the first streamed record; later records must fit it
    layout: Option<Shape>,
    options: &'o EncodeOptions,
    row: Row,
    summary: EncodeSummary,
}

impl<'w, 'o, W: RowWriter + ?Sized> RowSink<'w, 'o, W> {
    fn new(
        writer: &'w mut W,
        catalog: Arc<FieldCatalog>,
        record_type: RecordType,
        options: &'o EncodeOptions,
    ) -> Self {
        let row = Row::with_capacity(catalog.len());
        Self {
            writer,
            catalog,
            record_type,
            layout: None,
            options,
            row,
            summary: EncodeSummary::default(),
        }
    }

    /// Catalog discovered from the first record of a stream.
    fn from_first<R: Tabular>(writer: &'w mut W, first: &R, options: &'o EncodeOptions) -> Result<Self> {
        let record_type = first.row_type();
        let layout = first.row_shape();
        let catalog = CatalogBuilder::new(options.catalog.clone()).build(&layout)?;
        debug!(record_type = %record_type, columns = catalog.len(), "streaming catalog from first record");
        let mut sink = Self::new(writer, Arc::new(catalog), record_type, options);
        sink.layout = Some(layout);
        Ok(sink)
    }

    fn start<R: Tabular>(&mut self, first: &R) -> Result<()> {
        self.write_header()?;
        self.write_record(first)
    }

    fn write_all<R: Tabular>(&mut self, records: &[R]) -> Result<()> {
        self.write_header()?;
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        if self.options.omit_header {
            return Ok(());
        }
        self.writer.write_row(&self.catalog.header())?;
        self.summary.header_written = true;
        if let Some(metrics) = &self.options.metrics {
            metrics.record_header();
        }
        Ok(())
    }

    /// Write a record after checking it has the first record's type and layout.
    fn write_checked<R: Tabular>(&mut self, record: &R) -> Result<()> {
        let got = record.row_type();
        if got != self.record_type {
            let index = self.summary.rows_written;
            warn!(index, expected = %self.record_type, got = %got, "stream item of another type");
            return Err(EncodeError::shape_mismatch(format!(
                "stream item {} is {}, but the stream started with {}",
                index, got, self.record_type
            )));
        }
        if let Some(layout) = &self.layout {
            if !record.fits_layout(layout) {
                let index = self.summary.rows_written;
                warn!(index, record_type = %got, "stream item laid out differently");
                return Err(EncodeError::shape_mismatch(format!(
                    "stream item {} of {} does not match the fields of the first item",
                    index, got
                )));
            }
        }
        self.write_record(record)
    }

    fn write_record<R: Tabular>(&mut self, record: &R) -> Result<()> {
        project_into(record, &self.catalog, &mut self.row)?;
        self.writer.write_row(&self.row)?;
        self.summary.rows_written += 1;
        if let Some(metrics) = &self.options.metrics {
            metrics.record_row(&self.row);
        }
        Ok(())
    }

    /// Flush and check for a deferred writer error, unless `result` already failed.
    fn conclude(mut self, result: Result<()>) -> Result<EncodeSummary> {
        let outcome = match result {
            Ok(()) => self.finish(),
            Err(e) => Err(e),
        };
        if outcome.is_err() {
            if let Some(metrics) = &self.options.metrics {
                metrics.record_failure();
            }
        }
        outcome
    }

    fn finish(&mut self) -> Result<EncodeSummary> {
        self.writer.flush()?;
        match self.writer.last_error() {
            Some(err) => Err(EncodeError::Writer(err)),
            None => Ok(self.summary),
        }
    }
}
