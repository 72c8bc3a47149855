// src/process/reader.rs
use csv::ReaderBuilder;
use std::{collections::HashSet, fs, path::Path};
use tracing::{debug, info};

use crate::error::ReadError;
use crate::process::utils::{infer_delimiter, is_supported_extension};
use crate::schema::ReadOptions;
use crate::table::{Table, Value};

/// Load a delimited text file into a `Table`.
///
/// - The delimiter comes from `options`, or is inferred from the first line.
/// - Empty fields become `Value::Missing`; every other field is kept as `Value::Str`.
/// - Every record must have as many fields as the header.
#[tracing::instrument(level = "info", skip(path, options), fields(path = %path.as_ref().display()))]
pub fn read_table<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Table, ReadError> {
    let path = path.as_ref();
    if !is_supported_extension(path) {
        return Err(ReadError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let delimiter = match options.delimiter {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => return Err(ReadError::InvalidDelimiter(c)),
        None => {
            let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
            infer_delimiter(&String::from_utf8_lossy(first_line))
        }
    };
    debug!(delimiter = %(delimiter as char).escape_default(), "using delimiter");

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(false)
        .from_reader(bytes.as_slice());

    let malformed = |e: csv::Error| ReadError::Malformed {
        path: path.to_path_buf(),
        line: e.position().map_or(0, |p| p.line()),
        message: e.to_string(),
    };

    let mut records = rdr.records();
    let mut table = if options.has_headers {
        let header = records
            .next()
            .transpose()
            .map_err(malformed)?
            .ok_or_else(|| ReadError::NoHeader {
                path: path.to_path_buf(),
            })?;
        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(ReadError::DuplicateColumn {
                    path: path.to_path_buf(),
                    column: c.clone(),
                });
            }
        }
        Table::new(columns, delimiter)
    } else {
        // column names are synthesized from the first record's width
        let first = records.next().transpose().map_err(malformed)?;
        let width = first.as_ref().map_or(0, |r| r.len());
        let columns = (1..=width).map(|i| format!("column_{}", i)).collect();
        let mut table = Table::new(columns, delimiter);
        if let Some(record) = first {
            table.push_row(record.iter().map(to_value).collect());
        }
        table
    };

    for result in records {
        let record = result.map_err(malformed)?;
        table.push_row(record.iter().map(to_value).collect());
    }

    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "read table"
    );
    Ok(table)
}

fn to_value(field: &str) -> Value {
    if field.is_empty() {
        Value::Missing
    } else {
        Value::Str(field.to_string())
    }
}
