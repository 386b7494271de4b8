//! CSV persistence for historical tables and flat exports.
//!
//! Two write modes exist:
//! - history tables: read whole, extend, rewrite whole (`append_history`)
//! - exports: replaced with the freshly fetched table (`overwrite_export`)
//!
//! No locking is performed. Two processes appending to the same
//! history file at the same time will lose rows.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::schema::{INDEX, Table};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("history file {} could not be read: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("history file {} has no Date column", .path.display())]
    MissingIndex { path: PathBuf },

    #[error("file {} could not be written: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Loads an existing history table.
///
/// The file must exist and carry a header row containing `Date`.
/// Ragged rows are padded to the header width.
pub fn load_history(path: &Path) -> Result<Table> {
    let read_err = |source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(str::to_string)
        .collect();

    if !headers.iter().any(|h| h == INDEX) {
        return Err(StorageError::MissingIndex {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_parts(headers, rows))
}

/// Appends `fresh` to the history table at `path` and rewrites the file.
///
/// Returns the number of rows in the rewritten table.
pub fn append_history(path: &Path, fresh: &Table) -> Result<usize> {
    let mut history = load_history(path)?;
    let before = history.len();

    history.append(fresh);
    let history = history.with_column_first(INDEX);
    write_table(path, &history)?;

    debug!(
        "{}: {} rows + {} new = {}",
        path.display(),
        before,
        fresh.len(),
        history.len()
    );

    Ok(history.len())
}

/// Replaces the file at `path` with `table`, discarding prior content.
pub fn overwrite_export(path: &Path, table: &Table) -> Result<()> {
    write_table(path, table)?;
    debug!("{}: exported {} rows", path.display(), table.len());
    Ok(())
}

fn write_table(path: &Path, table: &Table) -> Result<()> {
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(table.headers()).map_err(write_err)?;
    for row in table.rows() {
        writer.write_record(row).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| write_err(csv::Error::from(e)))?;

    Ok(())
}
