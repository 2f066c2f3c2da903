//! Rowcast core: turn records into rows.
//!
//! This crate provides:
//! - [`catalog`]: `FieldCatalog` (ordered columns with resolution paths) built once per record shape
//! - [`projector`]: the row projector, walking each column's path against a record
//! - [`encoder`]: `Encoder`, the single-record incremental encoder
//! - [`drivers`]: bulk (`encode_all`) and streaming (`encode_source`, `encode_stream`) drivers
//! - [`writer`]: the `RowWriter` collaborator and its csv-backed implementation
//! - [`error`]: `EncodeError`, the error taxonomy shared by all of the above
//!
//! # Example
//!
//! ```
//! use rowcast_core::{encode_all, impl_tabular, CsvRowWriter, EncodeOptions};
//!
//! struct Pet {
//!     name: String,
//! }
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//!     pet: Option<Pet>,
//! }
//!
//! impl_tabular!(Pet { name => "Name" });
//! impl_tabular!(Person { name => "Name", age => "Age", pet => "Pet" });
//!
//! let people = vec![
//!     Person { name: "Ana".into(), age: 30, pet: None },
//!     Person { name: "Bo".into(), age: 5, pet: Some(Pet { name: "Rex".into() }) },
//! ];
//!
//! let mut writer = CsvRowWriter::new(Vec::new(), &Default::default());
//! encode_all(&mut writer, &people, &EncodeOptions::default()).unwrap();
//! let csv = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(csv, "Name,Age,Pet.Name\nAna,30,\nBo,5,Rex\n");
//! ```

pub mod catalog;
pub mod config;
pub mod drivers;
pub mod encoder;
pub mod error;
mod macros;
pub mod metrics;
pub mod projector;
pub mod source;
pub mod writer;

pub use catalog::{catalog_for, CatalogBuilder, CatalogOptions, Column, FieldCatalog, Path, Step};
pub use config::EncodeOptions;
pub use drivers::{encode_all, encode_channel, encode_source, encode_stream, EncodeSummary};
pub use encoder::Encoder;
pub use error::{EncodeError, Result};
pub use metrics::{EncodeMetrics, MetricsSnapshot};
pub use projector::{project, project_into, Row};
pub use source::{IterSource, RecordSource};
pub use writer::{CsvRowWriter, QuoteStyle, RowWriter, Terminator, WriterConfig};

pub use rowcast_types::{
    shape_of, Described, DynRecord, FieldShape, RecordAccess, RecordShape, RecordType, Reflect,
    Reflected, Scalar, ScalarKind, SequenceAccess, SequenceLen, Shape, Tabular, Value,
};
