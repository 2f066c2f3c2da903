//! Encode command - JSON records to delimited rows

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rowcast::env_utils::parse_delimiter;
use rowcast::pipeline::encode_json;
use rowcast::{CsvRowWriter, EncodeMetrics, EncodeOptions, QuoteStyle, Terminator};
use tracing::debug;

use super::InputArgs;

#[derive(Parser, Debug)]
pub struct EncodeCmd {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file (default: stdout)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the header row (also `ROWCAST_OMIT_HEADER`)
    #[arg(long)]
    pub no_header: bool,

    /// Cell delimiter: a single character, or `tab` (default: `ROWCAST_DELIMITER` or `,`)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Terminate rows with CRLF instead of LF (also `ROWCAST_CRLF`)
    #[arg(long)]
    pub crlf: bool,

    /// Quoting: necessary, always, never, non_numeric (default: `ROWCAST_QUOTE` or necessary)
    #[arg(long)]
    pub quote: Option<String>,

    /// Print encode counters to stderr when done
    #[arg(long)]
    pub stats: bool,
}

impl EncodeCmd {
    pub fn execute(&self) -> Result<()> {
        let options = self.options()?;
        let sink: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout().lock()),
        };
        let mut writer = CsvRowWriter::new(sink, &options.writer);

        let summary = encode_json(
            &mut writer,
            self.input.records()?,
            self.input.record_type(),
            &options,
        )?;
        writer
            .into_inner()
            .context("Failed to flush output")?
            .flush()?;
        debug!(
            rows = summary.rows_written,
            header = summary.header_written,
            "encode finished"
        );

        if let Some(metrics) = &options.metrics {
            eprintln!("{}", metrics.snapshot().format_report());
        }
        Ok(())
    }

    /// Environment defaults overridden by whatever flags were given.
    fn options(&self) -> Result<EncodeOptions> {
        let mut options = self.input.base_options();
        if self.no_header {
            options = options.with_omit_header(true);
        }
        if let Some(raw) = &self.delimiter {
            options.writer.delimiter = parse_delimiter(raw).ok_or_else(|| {
                anyhow!(
                    "invalid delimiter {:?}: expected one ASCII character or `tab`",
                    raw
                )
            })?;
        }
        if self.crlf {
            options.writer.terminator = Terminator::CrLf;
        }
        if let Some(raw) = &self.quote {
            options.writer.quote_style = QuoteStyle::from_str(raw)
                .ok_or_else(|| anyhow!("invalid quote style {:?}", raw))?;
        }
        if self.stats {
            options = options.with_metrics(EncodeMetrics::new());
        }
        Ok(options)
    }
}
