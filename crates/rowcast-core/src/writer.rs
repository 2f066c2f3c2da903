//! Row writer collaborator.
//!
//! The engine hands finished rows to a [`RowWriter`] and never escapes text
//! itself; quoting, delimiters, and record terminators belong to the writer.
//! [`CsvRowWriter`] is the standard implementation on top of the `csv` crate.

use std::io;

use serde::{Deserialize, Serialize};

/// Consumes rows of text cells.
pub trait RowWriter {
    fn write_row(&mut self, row: &[String]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Error deferred by an earlier `write_row` or `flush`, for writers that
    /// buffer failures instead of returning them.
    fn last_error(&mut self) -> Option<io::Error> {
        None
    }
}

impl<W: RowWriter + ?Sized> RowWriter for &mut W {
    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn last_error(&mut self) -> Option<io::Error> {
        (**self).last_error()
    }
}

/// In-memory capture, one `Vec<String>` per row.
impl RowWriter for Vec<Vec<String>> {
    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        self.push(row.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Record terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminator {
    #[default]
    Lf,
    CrLf,
}

/// When to quote a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// Only cells containing the delimiter, a quote, or a line break
    #[default]
    Necessary,
    Always,
    Never,
    /// Every cell that does not parse as a number
    NonNumeric,
}

impl QuoteStyle {
    /// Parse a quote style (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "necessary" => Some(Self::Necessary),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            "non_numeric" | "nonnumeric" => Some(Self::NonNumeric),
            _ => None,
        }
    }
}

/// Text layout of written rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    pub delimiter: u8,
    pub terminator: Terminator,
    pub quote_style: QuoteStyle,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::Lf,
            quote_style: QuoteStyle::Necessary,
        }
    }
}

/// Delimited-text writer backed by `csv::Writer`.
pub struct CsvRowWriter<W: io::Write> {
    inner: csv::Writer<W>,
}

impl<W: io::Write> CsvRowWriter<W> {
    pub fn new(writer: W, config: &WriterConfig) -> Self {
        let terminator = match config.terminator {
            Terminator::Lf => csv::Terminator::Any(b'\n'),
            Terminator::CrLf => csv::Terminator::CRLF,
        };
        let quote_style = match config.quote_style {
            QuoteStyle::Necessary => csv::QuoteStyle::Necessary,
            QuoteStyle::Always => csv::QuoteStyle::Always,
            QuoteStyle::Never => csv::QuoteStyle::Never,
            QuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
        };
        let inner = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .terminator(terminator)
            .quote_style(quote_style)
            .from_writer(writer);
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: io::Write> RowWriter for CsvRowWriter<W> {
    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        self.inner.write_record(row).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
