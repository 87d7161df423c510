//! Column identifiers
//!
//! A table carries at most seven data columns, A through G.
//! `Column::None` is a sentinel and never addresses data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of data columns a source row can carry
pub const DATA_COLUMNS: usize = 7;

/// Column identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Column {
    /// Not set / no grouping / inactive selection
    #[default]
    None,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Column {
    /// All data columns in storage order
    pub const DATA: [Column; DATA_COLUMNS] = [
        Column::A,
        Column::B,
        Column::C,
        Column::D,
        Column::E,
        Column::F,
        Column::G,
    ];

    /// Returns the storage position of this column in a source row.
    ///
    /// The sentinel has no position.
    pub fn slot(&self) -> Option<usize> {
        match self {
            Column::None => None,
            Column::A => Some(0),
            Column::B => Some(1),
            Column::C => Some(2),
            Column::D => Some(3),
            Column::E => Some(4),
            Column::F => Some(5),
            Column::G => Some(6),
        }
    }

    /// Returns true for the `None` sentinel
    pub fn is_none(&self) -> bool {
        matches!(self, Column::None)
    }

    /// Letter used in rendered queries
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::None => "-",
            Column::A => "A",
            Column::B => "B",
            Column::C => "C",
            Column::D => "D",
            Column::E => "E",
            Column::F => "F",
            Column::G => "G",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
