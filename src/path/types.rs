//! Reference types
//!
//! Typed results of reference parsing. Indices are 0-based; the external
//! grammar is 1-based for rows and letter-based for columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Character separating the two ends of a range token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeDelimiter {
    /// `B2:D8`
    #[default]
    Colon,
    /// `B2-D8`
    Hyphen,
}

impl RangeDelimiter {
    pub fn as_char(self) -> char {
        match self {
            RangeDelimiter::Colon => ':',
            RangeDelimiter::Hyphen => '-',
        }
    }
}

impl fmt::Display for RangeDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for RangeDelimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "colon" | ":" => Ok(RangeDelimiter::Colon),
            "hyphen" | "-" => Ok(RangeDelimiter::Hyphen),
            other => Err(format!("unknown range delimiter '{}'", other)),
        }
    }
}

/// Extent of a reference along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Every index (`*`)
    Unbounded,
    /// Inclusive span with `start <= end`
    Span { start: u32, end: u32 },
}

impl Bounds {
    /// A single index
    pub fn single(index: u32) -> Self {
        Bounds::Span {
            start: index,
            end: index,
        }
    }

    /// A span, normalized so that `start <= end`
    pub fn span(a: u32, b: u32) -> Self {
        Bounds::Span {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bounds::Unbounded)
    }

    /// Index of a single-index span
    pub fn as_single(&self) -> Option<u32> {
        match *self {
            Bounds::Span { start, end } if start == end => Some(start),
            _ => None,
        }
    }
}

/// Rows and columns addressed by a table reference
///
/// Only shapes expressible in the external grammar can be built: all cells,
/// a whole row, a whole column, a single cell, or a rectangular area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableArea {
    rows: Bounds,
    cols: Bounds,
}

impl TableArea {
    /// Every cell (`*`)
    pub fn all() -> Self {
        Self {
            rows: Bounds::Unbounded,
            cols: Bounds::Unbounded,
        }
    }

    /// Every cell of one row (`*4`)
    pub fn row(row: u32) -> Self {
        Self {
            rows: Bounds::single(row),
            cols: Bounds::Unbounded,
        }
    }

    /// Every cell of one column (`D*`)
    pub fn column(col: u32) -> Self {
        Self {
            rows: Bounds::Unbounded,
            cols: Bounds::single(col),
        }
    }

    /// One cell (`D4`)
    pub fn cell(row: u32, col: u32) -> Self {
        Self {
            rows: Bounds::single(row),
            cols: Bounds::single(col),
        }
    }

    /// Rectangle between two corners in any order (`G8:D4`)
    pub fn area(row_a: u32, col_a: u32, row_b: u32, col_b: u32) -> Self {
        Self {
            rows: Bounds::span(row_a, row_b),
            cols: Bounds::span(col_a, col_b),
        }
    }

    pub fn rows(&self) -> Bounds {
        self.rows
    }

    pub fn cols(&self) -> Bounds {
        self.cols
    }

    /// Whether this area names exactly one cell
    pub fn is_cell(&self) -> bool {
        self.rows.as_single().is_some() && self.cols.as_single().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_parse() {
        assert_eq!("colon".parse::<RangeDelimiter>(), Ok(RangeDelimiter::Colon));
        assert_eq!("-".parse::<RangeDelimiter>(), Ok(RangeDelimiter::Hyphen));
        assert_eq!(" Hyphen ".parse::<RangeDelimiter>(), Ok(RangeDelimiter::Hyphen));
        assert!("slash".parse::<RangeDelimiter>().is_err());
    }

    #[test]
    fn test_delimiter_default() {
        assert_eq!(RangeDelimiter::default().as_char(), ':');
    }

    #[test]
    fn test_area_normalizes_corners() {
        let area = TableArea::area(7, 6, 3, 3);
        assert_eq!(area.rows(), Bounds::Span { start: 3, end: 7 });
        assert_eq!(area.cols(), Bounds::Span { start: 3, end: 6 });
        assert!(!area.is_cell());
    }

    #[test]
    fn test_cell_shape() {
        assert!(TableArea::cell(3, 3).is_cell());
        assert!(TableArea::area(2, 1, 2, 1).is_cell());
        assert!(!TableArea::row(3).is_cell());
        assert!(TableArea::column(3).rows().is_unbounded());
    }
}
