use csv::WriterBuilder;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::WriteError;
use crate::table::Table;

/// Serialize `table` to `path` with its own delimiter and a header row.
///
/// The rows go to a uniquely named temp file in the destination directory,
/// which is then renamed into place. A failed write never leaves a truncated
/// output behind, and concurrent writers never share a temp file.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), WriteError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let csv_err = |source| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    };

    // removed on drop unless persisted
    let tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| WriteError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    write_rows(table, &tmp, csv_err)?;
    tmp.persist(path).map_err(|e| WriteError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    info!(rows = table.num_rows(), "wrote table");
    Ok(())
}

fn write_rows<F>(table: &Table, tmp: &NamedTempFile, csv_err: F) -> Result<(), WriteError>
where
    F: Fn(csv::Error) -> WriteError,
{
    let mut wtr = WriterBuilder::new()
        .delimiter(table.delimiter())
        .from_writer(tmp.as_file());
    wtr.write_record(table.columns()).map_err(&csv_err)?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| v.render()))
            .map_err(&csv_err)?;
    }
    wtr.flush().map_err(|source| WriteError::Io {
        path: tmp.path().to_path_buf(),
        source,
    })
}
