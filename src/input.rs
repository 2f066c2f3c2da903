//! JSON record input.
//!
//! Two layouts are accepted: a single JSON document (an array of records, or
//! one record) and JSON Lines (one record per non-blank line).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value as JsonValue;

/// Record iterator produced by [`json_records`].
pub type JsonRecords = Box<dyn Iterator<Item = Result<JsonValue>> + Send>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One JSON document: an array of records or a single record.
    Json,
    /// One JSON record per line.
    Jsonl,
}

impl InputFormat {
    /// Guess from the file extension; anything unrecognized is plain JSON.
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => InputFormat::Jsonl,
            _ => InputFormat::Json,
        }
    }
}

/// Open `path` for reading, with `-` meaning stdin.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file =
        File::open(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Records of `reader` in input order.
///
/// A JSON document is parsed up front, so a malformed document fails here.
/// JSON Lines are parsed lazily and a bad line fails as its item.
pub fn json_records<R>(reader: R, format: InputFormat) -> Result<JsonRecords>
where
    R: BufRead + Send + 'static,
{
    match format {
        InputFormat::Json => {
            let value: JsonValue =
                serde_json::from_reader(reader).context("Failed to parse JSON input")?;
            let items = match value {
                JsonValue::Array(items) => items,
                other => vec![other],
            };
            Ok(Box::new(items.into_iter().map(Ok)))
        }
        InputFormat::Jsonl => Ok(Box::new(reader.lines().enumerate().filter_map(
            |(i, line)| match line {
                Err(e) => Some(Err(anyhow::Error::new(e)
                    .context(format!("Failed to read JSONL line {}", i + 1)))),
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(
                    serde_json::from_str::<JsonValue>(&line)
                        .with_context(|| format!("Invalid JSONL at line {}", i + 1)),
                ),
            },
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(raw: &'static str, format: InputFormat) -> Result<Vec<JsonValue>> {
        json_records(Cursor::new(raw), format)?.collect()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(InputFormat::detect(Path::new("rows.jsonl")), InputFormat::Jsonl);
        assert_eq!(InputFormat::detect(Path::new("rows.NDJSON")), InputFormat::Jsonl);
        assert_eq!(InputFormat::detect(Path::new("rows.json")), InputFormat::Json);
        assert_eq!(InputFormat::detect(Path::new("-")), InputFormat::Json);
    }

    #[test]
    fn test_json_array_and_single_object() {
        let items = collect(r#"[{"a": 1}, {"a": 2}]"#, InputFormat::Json).unwrap();
        assert_eq!(items.len(), 2);
        let items = collect(r#"{"a": 1}"#, InputFormat::Json).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let items = collect("{\"a\": 1}\n\n  \n{\"a\": 2}\n", InputFormat::Jsonl).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["a"], 2);
    }

    #[test]
    fn test_jsonl_reports_bad_line_number() {
        let err = collect("{\"a\": 1}\n{oops\n", InputFormat::Jsonl).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_malformed_json_document_fails_up_front() {
        assert!(json_records(Cursor::new("[1, 2"), InputFormat::Json).is_err());
    }
}
