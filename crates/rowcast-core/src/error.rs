//! Error taxonomy for encoding.
//!
//! | Variant | Raised when | Fatal to |
//! |---------|-------------|----------|
//! | `ShapeMismatch` | a record's runtime structure disagrees with its catalog | current call |
//! | `TypeMismatch` | an encoder receives a record of another type | current call |
//! | `UnsupportedShape` | a shape cannot be laid out, or a path ends on a non-leaf | current call |
//! | `EmptySource` | a streaming source closes before yielding anything | whole stream |
//! | `Writer` | the row writer fails | whole operation |
//!
//! Absent optionals and short sequences are never errors; they become empty cells.

use std::io;

use rowcast_types::RecordType;

pub type Result<T, E = EncodeError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum EncodeError {
    /// Record structure does not match the catalog it is projected against.
    ShapeMismatch {
        /// Header of the column being resolved, if the failure is column-specific
        column: Option<String>,
        /// What disagreed
        detail: String,
    },

    /// An encoder built for one record type received another.
    TypeMismatch {
        expected: RecordType,
        got: RecordType,
    },

    /// A shape the catalog builder or the scalar conversion cannot handle.
    UnsupportedShape {
        column: Option<String>,
        detail: String,
    },

    /// Streaming source yielded no records.
    EmptySource,

    /// Propagated verbatim from the row writer.
    Writer(io::Error),
}

impl EncodeError {
    pub fn shape_mismatch(detail: impl Into<String>) -> Self {
        EncodeError::ShapeMismatch {
            column: None,
            detail: detail.into(),
        }
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        EncodeError::UnsupportedShape {
            column: None,
            detail: detail.into(),
        }
    }

    /// Attach the header of the column that failed.
    pub fn in_column(self, name: &str) -> Self {
        match self {
            EncodeError::ShapeMismatch { detail, .. } => EncodeError::ShapeMismatch {
                column: Some(name.to_string()),
                detail,
            },
            EncodeError::UnsupportedShape { detail, .. } => EncodeError::UnsupportedShape {
                column: Some(name.to_string()),
                detail,
            },
            other => other,
        }
    }

    pub fn is_writer(&self) -> bool {
        matches!(self, EncodeError::Writer(_))
    }
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::ShapeMismatch { column, detail } => {
                write!(f, "SHAPE_MISMATCH: {}", detail)?;
                if let Some(c) = column {
                    write!(f, " (column '{}')", c)?;
                }
                Ok(())
            }
            EncodeError::TypeMismatch { expected, got } => write!(
                f,
                "TYPE_MISMATCH: encoder was initialized to encode {}, but received {}",
                expected, got
            ),
            EncodeError::UnsupportedShape { column, detail } => {
                write!(f, "UNSUPPORTED_SHAPE: {}", detail)?;
                if let Some(c) = column {
                    write!(f, " (column '{}')", c)?;
                }
                Ok(())
            }
            EncodeError::EmptySource => write!(
                f,
                "EMPTY_SOURCE: record source closed without yielding a record"
            ),
            EncodeError::Writer(e) => write!(f, "WRITER_ERROR: {}", e),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Writer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for EncodeError {
    fn from(e: io::Error) -> Self {
        EncodeError::Writer(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_column() {
        let err = EncodeError::shape_mismatch("expected a record, found text").in_column("Pet.Name");
        assert_eq!(
            err.to_string(),
            "SHAPE_MISMATCH: expected a record, found text (column 'Pet.Name')"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = EncodeError::TypeMismatch {
            expected: RecordType::new("Person"),
            got: RecordType::new("Pet"),
        };
        assert_eq!(
            err.to_string(),
            "TYPE_MISMATCH: encoder was initialized to encode Person, but received Pet"
        );
    }

    #[test]
    fn test_writer_error_keeps_source() {
        let err = EncodeError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(err.is_writer());
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk full");
    }
}
