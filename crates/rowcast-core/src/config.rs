//! Encode configuration.
//!
//! Options can be assembled with the builder methods or read from the
//! environment:
//!
//! | Variable | Effect | Default |
//! |----------|--------|---------|
//! | `ROWCAST_OMIT_HEADER` | skip the header row | `false` |
//! | `ROWCAST_DELIMITER` | cell delimiter (`,`, `;`, `\t`, ...) | `,` |
//! | `ROWCAST_SEPARATOR` | joins nested field names | `.` |
//! | `ROWCAST_CRLF` | terminate rows with `\r\n` | `false` |
//! | `ROWCAST_QUOTE` | `necessary`, `always`, `never`, `non_numeric` | `necessary` |

use rowcast_types::env_utils::{env_bool_or, env_delimiter, env_var};

use crate::catalog::CatalogOptions;
use crate::metrics::EncodeMetrics;
use crate::writer::{QuoteStyle, Terminator, WriterConfig};

/// Options shared by the bulk and streaming drivers.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Skip the header row
    pub omit_header: bool,
    pub catalog: CatalogOptions,
    /// Used by callers that build a `CsvRowWriter` from these options
    pub writer: WriterConfig,
    /// Counters to update, if any
    pub metrics: Option<EncodeMetrics>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `ROWCAST_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = WriterConfig::default();
        let writer = WriterConfig {
            delimiter: env_delimiter("ROWCAST_DELIMITER").unwrap_or(defaults.delimiter),
            terminator: if env_bool_or("ROWCAST_CRLF", false) {
                Terminator::CrLf
            } else {
                Terminator::Lf
            },
            quote_style: env_var::<String>("ROWCAST_QUOTE")
                .and_then(|s| QuoteStyle::from_str(&s))
                .unwrap_or(defaults.quote_style),
        };
        let catalog = CatalogOptions {
            separator: env_var("ROWCAST_SEPARATOR")
                .unwrap_or_else(|| CatalogOptions::default().separator),
        };
        Self {
            omit_header: env_bool_or("ROWCAST_OMIT_HEADER", false),
            catalog,
            writer,
            metrics: None,
        }
    }

    pub fn with_omit_header(mut self, omit: bool) -> Self {
        self.omit_header = omit;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.catalog.separator = separator.into();
        self
    }

    pub fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_metrics(mut self, metrics: EncodeMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let metrics = EncodeMetrics::new();
        let options = EncodeOptions::new()
            .with_omit_header(true)
            .with_separator("/")
            .with_writer(WriterConfig {
                delimiter: b';',
                ..Default::default()
            })
            .with_metrics(metrics);
        assert!(options.omit_header);
        assert_eq!(options.catalog.separator, "/");
        assert_eq!(options.writer.delimiter, b';');
        assert!(options.metrics.is_some());
    }

    #[test]
    fn test_from_env_defaults() {
        // None of the ROWCAST_* variables are set in the test environment.
        let options = EncodeOptions::from_env();
        assert!(!options.omit_header);
        assert_eq!(options.catalog.separator, ".");
        assert_eq!(options.writer, WriterConfig::default());
    }
}
