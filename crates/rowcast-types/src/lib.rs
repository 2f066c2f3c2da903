//! Shared types for the rowcast workspace.
//!
//! This crate describes *what* a record looks like and *how* to walk a value of
//! that record at runtime, without knowing anything about rows or writers:
//!
//! - [`shape`]: static structure ([`Shape`], [`RecordShape`], [`FieldShape`]) and
//!   record identity ([`RecordType`])
//! - [`reflect`]: the value-accessor capability ([`Reflect`], [`Reflected`]) plus
//!   impls for std containers, scalars, and chrono timestamps
//! - [`scalar`]: leaf values and their locale-free text form
//! - [`value`]: a dynamic [`Value`] model for records discovered at runtime (JSON input)
//! - [`env_utils`]: environment-variable helpers used by the configuration layer

pub mod env_utils;
pub mod reflect;
pub mod scalar;
pub mod shape;
pub mod value;

pub use reflect::{shape_of, Described, RecordAccess, Reflect, Reflected, SequenceAccess, Tabular};
pub use scalar::Scalar;
pub use shape::{FieldShape, RecordShape, RecordType, ScalarKind, SequenceLen, Shape};
pub use value::{DynRecord, Value};
