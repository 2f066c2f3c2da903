//! JSON to rows through the blocking streaming driver.
//!
//! A reader thread parses records and sends them over a bounded channel; the
//! calling thread drains the channel with [`encode_source`]. The first record
//! fixes the shape and every record, the first included, is conformed to it,
//! so records that omit keys or carry extra ones still line up with the header.
//!
//! When the reader fails, its error wins over whatever the encoder saw (an
//! early parse error otherwise shows up as an empty source).

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use rowcast_core::{
    encode_source, CatalogBuilder, CatalogOptions, EncodeOptions, EncodeSummary, FieldCatalog,
    RowWriter,
};
use rowcast_types::{RecordType, Shape, Tabular, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::input::JsonRecords;

/// Records buffered between the reader thread and the encoder.
pub const CHANNEL_CAPACITY: usize = 1024;

/// Spawn the reader thread. It returns how many records it sent.
///
/// The thread stops early, without error, once the receiver is dropped.
pub fn spawn_reader(
    records: JsonRecords,
    record_type: RecordType,
) -> (Receiver<Value>, JoinHandle<Result<usize>>) {
    let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
    let handle = thread::spawn(move || -> Result<usize> {
        let mut shape: Option<Shape> = None;
        let mut sent = 0usize;
        for item in records {
            let json = item?;
            // The first record is conformed too: its own list elements may
            // differ from the element shape inferred from their first entry.
            let layout = shape
                .get_or_insert_with(|| Value::from_json(record_type.clone(), &json).row_shape());
            let value = Value::conform_json(layout, &json);
            if tx.send(value).is_err() {
                debug!(sent, "encoder hung up; reader stopping");
                break;
            }
            sent += 1;
        }
        Ok(sent)
    });
    (rx, handle)
}

/// Encode every record of `records` into `writer`.
pub fn encode_json<W>(
    writer: &mut W,
    records: JsonRecords,
    record_type: RecordType,
    options: &EncodeOptions,
) -> Result<EncodeSummary>
where
    W: RowWriter + ?Sized,
{
    let (rx, reader) = spawn_reader(records, record_type);
    // `rx` moves into the driver and is dropped when it returns, which unblocks
    // a reader stuck on a full channel.
    let encoded = encode_source(writer, rx, options);
    let read = reader
        .join()
        .map_err(|_| anyhow!("input reader thread panicked"))?;

    match (encoded, read) {
        (_, Err(e)) => Err(e),
        (Err(e), Ok(_)) => Err(e.into()),
        (Ok(summary), Ok(sent)) => {
            info!(
                records = sent,
                rows = summary.rows_written,
                "encoded JSON input"
            );
            Ok(summary)
        }
    }
}

/// Catalog the first record of `records` lays out, or an error if there is none.
pub fn infer_catalog(
    mut records: JsonRecords,
    record_type: RecordType,
    options: &CatalogOptions,
) -> Result<FieldCatalog> {
    let json: JsonValue = records
        .next()
        .ok_or(rowcast_core::EncodeError::EmptySource)??;
    let first = Value::from_json(record_type, &json);
    let catalog = CatalogBuilder::new(options.clone()).build(&first.row_shape())?;
    Ok(catalog)
}
