//! In-memory record set exchanged between collectors and storage.
//!
//! A `Table` is the unit of data every collector returns and every
//! history file is loaded into:
//! - an ordered list of column names
//! - rows of string cells, one cell per column
//!
//! DESIGN NOTES:
//! - Cells are kept as strings so values survive a CSV round trip
//!   exactly as the upstream API rendered them.
//! - Accumulating sources carry a `Date` column (see `INDEX`).
//!

/// Name of the date index column in every historical table.
pub const INDEX: &str = "Date";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from already parsed headers and rows.
    ///
    /// Rows shorter than the header are padded with empty cells,
    /// longer rows are truncated.
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self {
            headers,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Appends one row, normalized to the header width.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Drops all but the last `n` rows.
    pub fn keep_last(&mut self, n: usize) {
        let excess = self.rows.len().saturating_sub(n);
        self.rows.drain(..excess);
    }

    /// Returns all cells of a column, top to bottom.
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Appends the rows of `other` below the existing rows.
    ///
    /// Columns are matched by name, not by position:
    /// - columns missing in `other` are left empty for the new rows
    /// - columns only present in `other` are added to the end of the
    ///   header and left empty for the existing rows
    ///
    /// Row order is preserved on both sides. No deduplication and no
    /// ordering check on the date index is performed.
    pub fn append(&mut self, other: &Table) {
        for header in &other.headers {
            if self.column(header).is_none() {
                self.headers.push(header.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let mapping: Vec<usize> = other
            .headers
            .iter()
            .filter_map(|h| self.column(h))
            .collect();

        for src in &other.rows {
            let mut row = vec![String::new(); self.headers.len()];
            for (cell, &dst) in src.iter().zip(&mapping) {
                row[dst] = cell.clone();
            }
            self.rows.push(row);
        }
    }

    /// Moves the named column to the front, keeping all other columns
    /// in their current order. No-op if the column is absent.
    pub fn with_column_first(mut self, name: &str) -> Self {
        if let Some(idx) = self.column(name) {
            if idx != 0 {
                let header = self.headers.remove(idx);
                self.headers.insert(0, header);
                for row in &mut self.rows {
                    let cell = row.remove(idx);
                    row.insert(0, cell);
                }
            }
        }
        self
    }
}
