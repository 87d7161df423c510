//! Ordered table of rows and its canonical form

use std::fmt;

use serde::{Deserialize, Serialize};

use super::row::Row;

/// An ordered sequence of rows.
///
/// Row order is part of equality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from rows
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Appends a row
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns the rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width shared by every row, or `None` for a ragged table.
    ///
    /// An empty table has width 0.
    pub fn uniform_width(&self) -> Option<usize> {
        let mut widths = self.rows.iter().map(Row::width);
        let first = widths.next().unwrap_or(0);
        widths.all(|w| w == first).then_some(first)
    }

    /// Canonical text form used as the equality oracle.
    ///
    /// Every row renders as `(v0,v1,...)`, concatenated in row order with no
    /// separators. An empty table renders as the empty string.
    pub fn canonical(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * 8);
        for row in &self.rows {
            out.push_str(&row.to_string());
        }
        out
    }

    /// CRC32 of the canonical form
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(self.canonical().as_bytes())
    }

    /// Returns true if both tables have the same canonical form
    pub fn same_result(&self, other: &Table) -> bool {
        self.canonical() == other.canonical()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Table {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
