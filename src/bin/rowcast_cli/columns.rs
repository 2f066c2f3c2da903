//! Columns command - show the catalog inferred from the first record

use anyhow::Result;
use clap::Parser;
use rowcast::pipeline::infer_catalog;
use serde::Serialize;

use super::InputArgs;

#[derive(Parser, Debug)]
pub struct ColumnsCmd {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ColumnInfo<'a> {
    name: &'a str,
    aliases: &'a [String],
    path: String,
}

impl ColumnsCmd {
    pub fn execute(&self) -> Result<()> {
        let options = self.input.base_options();
        let catalog = infer_catalog(
            self.input.records()?,
            self.input.record_type(),
            &options.catalog,
        )?;

        if self.json {
            let columns: Vec<ColumnInfo<'_>> = catalog
                .columns()
                .iter()
                .map(|column| ColumnInfo {
                    name: column.display_name(),
                    aliases: column.names().get(1..).unwrap_or_default(),
                    path: column.path().to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&columns)?);
            return Ok(());
        }

        let width = catalog
            .columns()
            .iter()
            .map(|c| c.display_name().len())
            .max()
            .unwrap_or(0);
        for column in catalog.columns() {
            println!("{:<width$}  {}", column.display_name(), column.path(), width = width);
        }
        Ok(())
    }
}
