use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the provenance column appended when a table joins a batch result.
pub const SOURCE_COLUMN: &str = "_source_file";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("No tables to merge")]
    Empty,
    #[error("Table #{0} has no '_source_file' provenance column")]
    Untagged(usize),
}

/// A dense rectangular table of strings with named columns.
///
/// Columns materialized from a recognition grid are named positionally
/// (`"0"`, `"1"`, …); the provenance column is appended by [`Table::tag_source`]
/// before tables are merged into a batch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Materialize a dense grid as a table with positional column names.
    /// The grid must be rectangular; an empty grid yields an empty table.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let width = grid.first().map(Vec::len).unwrap_or(0);
        debug_assert!(grid.iter().all(|row| row.len() == width));
        Table {
            columns: (0..width).map(|c| c.to_string()).collect(),
            rows: grid,
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Remove rows that are empty in every column, then columns that are
    /// empty in every remaining row, and renumber the positional column
    /// names contiguously from zero. Idempotent.
    pub fn drop_empty(&mut self) {
        self.rows.retain(|row| row.iter().any(|cell| !cell.is_empty()));

        let kept: Vec<usize> = (0..self.columns.len())
            .filter(|&c| self.rows.iter().any(|row| !row[c].is_empty()))
            .collect();

        if kept.len() != self.columns.len() {
            self.rows = self
                .rows
                .iter()
                .map(|row| kept.iter().map(|&c| row[c].clone()).collect())
                .collect();
        }
        self.columns = (0..kept.len()).map(|c| c.to_string()).collect();
    }

    /// Append the provenance column, naming the file this table came from.
    pub fn tag_source(&mut self, file: &str) {
        self.columns.push(SOURCE_COLUMN.to_string());
        for row in &mut self.rows {
            row.push(file.to_string());
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.columns.iter().any(|c| c == SOURCE_COLUMN)
    }

    /// Row-wise concatenation of provenance-tagged tables.
    ///
    /// The merged column set is the union of the inputs' columns, in
    /// first-seen order, with the provenance column forced last. Values for
    /// columns a table lacks are filled with the empty string. Row order is
    /// stable: all rows of the first table, then the second, and so on.
    pub fn merge(tables: Vec<Table>) -> Result<Table, MergeError> {
        if tables.is_empty() {
            return Err(MergeError::Empty);
        }
        for (i, table) in tables.iter().enumerate() {
            if !table.is_tagged() {
                return Err(MergeError::Untagged(i));
            }
        }

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for name in &table.columns {
                if name != SOURCE_COLUMN && !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        columns.push(SOURCE_COLUMN.to_string());

        let mut rows = Vec::new();
        for table in &tables {
            for row in &table.rows {
                rows.push(
                    columns
                        .iter()
                        .map(|name| {
                            table
                                .columns
                                .iter()
                                .position(|c| c == name)
                                .map(|idx| row[idx].clone())
                                .unwrap_or_default()
                        })
                        .collect(),
                );
            }
        }

        Ok(Table { columns, rows })
    }
}
