//! Subcommands of the rowcast CLI.

pub mod columns;
pub mod encode;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rowcast::input::{json_records, open_input, InputFormat, JsonRecords};
use rowcast::{EncodeOptions, RecordType};

/// Where records come from. Shared by every subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input file, or `-` for stdin
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    /// Input layout (default: from the file extension, `.jsonl`/`.ndjson` are JSON Lines)
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Record type name, used in error messages
    #[arg(long, default_value = "record")]
    pub type_name: String,

    /// Joins nested field names in column headers (default: `ROWCAST_SEPARATOR` or `.`)
    #[arg(long)]
    pub separator: Option<String>,
}

impl InputArgs {
    pub fn records(&self) -> Result<JsonRecords> {
        let format = self
            .format
            .unwrap_or_else(|| InputFormat::detect(&self.input));
        json_records(open_input(&self.input)?, format)
    }

    /// Options from `ROWCAST_*` variables, with `--separator` applied on top.
    pub fn base_options(&self) -> EncodeOptions {
        let options = EncodeOptions::from_env();
        match &self.separator {
            Some(separator) => options.with_separator(separator.clone()),
            None => options,
        }
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::new(self.type_name.as_str())
    }
}
