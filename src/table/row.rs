//! Row representation
//!
//! A row is a positional sequence of integers. Source rows keep column A at
//! position 0 through column G at position 6; result rows are positional only.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::Column;

/// A single row of integer values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<i64>,
}

impl Row {
    /// Creates a row from positional values
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Creates a source row from (column, value) pairs.
    ///
    /// Width is the highest addressed slot plus one; unaddressed slots are zero.
    /// Pairs naming the sentinel are ignored.
    pub fn from_pairs(pairs: &[(Column, i64)]) -> Self {
        let width = pairs
            .iter()
            .filter_map(|(col, _)| col.slot())
            .max()
            .map_or(0, |slot| slot + 1);

        let mut values = vec![0; width];
        for (col, value) in pairs {
            if let Some(slot) = col.slot() {
                values[slot] = *value;
            }
        }
        Self { values }
    }

    /// Returns the value stored for `column`.
    ///
    /// Returns None for the sentinel or a column beyond this row's width.
    pub fn get(&self, column: Column) -> Option<i64> {
        column.slot().and_then(|slot| self.values.get(slot).copied())
    }

    /// Returns the value at an output position
    pub fn at(&self, position: usize) -> Option<i64> {
        self.values.get(position).copied()
    }

    /// Returns all values in position order
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of values in this row
    pub fn width(&self) -> usize {
        self.values.len()
    }
}

impl From<Vec<i64>> for Row {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}

impl fmt::Display for Row {
    /// Canonical row form: `(v0,v1,...)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_zero_fills() {
        let row = Row::from_pairs(&[(Column::C, 7), (Column::A, 1)]);
        assert_eq!(row.values(), &[1, 0, 7]);
        assert_eq!(row.get(Column::C), Some(7));
        assert_eq!(row.get(Column::D), None);
    }

    #[test]
    fn test_sentinel_has_no_value() {
        let row = Row::new(vec![1, 2, 3]);
        assert_eq!(row.get(Column::None), None);
    }

    #[test]
    fn test_display_is_compact() {
        assert_eq!(Row::new(vec![8, -9, 3]).to_string(), "(8,-9,3)");
        assert_eq!(Row::default().to_string(), "()");
    }
}
