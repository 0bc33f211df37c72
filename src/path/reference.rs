//! Table Reference Parser
//!
//! Converts spreadsheet-style references into canonical row and column
//! segments and back.
//!
//! Grammar:
//! ```text
//! reference = "*" | cell | row | column | area
//! cell      = letters digits          ; D4
//! row       = "*" digits              ; *4
//! column    = letters "*"             ; D*
//! area      = cell DELIM cell         ; D4:G8
//! letters   = [A-Z]+
//! digits    = [1-9][0-9]*
//! ```
//!
//! The cache tree stores a row level above a column level, so a reference
//! expands into `[row, column]`, e.g. `D4 -> ["4", "D"]` and
//! `D4:G8 -> ["4:8", "D:G"]`.

use crate::error::{CacheError, Result};

use super::types::{Bounds, RangeDelimiter, TableArea};

/// Wildcard token matching every key of a level
pub const WILDCARD: &str = "*";

/// Convert column letters into a 0-based index (`A` = 0, `AA` = 26)
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut number: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        let digit = ch as u32 - 'A' as u32 + 1;
        number = number.checked_mul(26)?.checked_add(digit)?;
    }

    Some(number - 1)
}

/// Convert a 0-based column index into letters (`0` = `A`, `26` = `AA`)
pub fn column_letters(index: u32) -> String {
    let mut remaining = index as u64 + 1;
    let mut letters = Vec::new();

    while remaining > 0 {
        remaining -= 1;
        letters.push((b'A' + (remaining % 26) as u8) as char);
        remaining /= 26;
    }

    letters.iter().rev().collect()
}

/// Split a range token `lo<delim>hi` into its two ends
///
/// Both ends must be non-empty and the delimiter must occur exactly once.
pub fn split_range(token: &str, delimiter: RangeDelimiter) -> Option<(&str, &str)> {
    let (lo, hi) = token.split_once(delimiter.as_char())?;
    if lo.is_empty() || hi.is_empty() || hi.contains(delimiter.as_char()) {
        return None;
    }
    Some((lo, hi))
}

/// Whether a query segment matches more than one key
pub fn is_bulk_token(segment: &str, delimiter: RangeDelimiter) -> bool {
    segment == WILDCARD || split_range(segment, delimiter).is_some()
}

/// Parse a 1-based row number into a 0-based index
fn parse_row(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse::<u32>().ok().map(|row| row - 1)
}

/// Split a reference at the boundary between its column and row part
fn split_cell(reference: &str) -> Option<(&str, &str)> {
    let boundary = if reference.starts_with('*') {
        1
    } else {
        reference
            .find(|ch: char| !ch.is_ascii_uppercase())
            .unwrap_or(reference.len())
    };

    let (col, row) = reference.split_at(boundary);
    if col.is_empty() || row.is_empty() {
        return None;
    }
    Some((col, row))
}

/// Parse one corner of an area (no wildcards allowed)
fn parse_corner(corner: &str) -> Option<(u32, u32)> {
    let (col, row) = split_cell(corner)?;
    Some((parse_row(row)?, column_index(col)?))
}

/// Parse an external table reference
pub fn parse_reference(reference: &str, delimiter: RangeDelimiter) -> Result<TableArea> {
    let invalid = || CacheError::InvalidReference(reference.to_string());

    if reference == WILDCARD {
        return Ok(TableArea::all());
    }

    if let Some((start, end)) = split_range(reference, delimiter) {
        let (row_a, col_a) = parse_corner(start).ok_or_else(invalid)?;
        let (row_b, col_b) = parse_corner(end).ok_or_else(invalid)?;
        return Ok(TableArea::area(row_a, col_a, row_b, col_b));
    }

    let (col, row) = split_cell(reference).ok_or_else(invalid)?;
    match (col, row) {
        (WILDCARD, WILDCARD) => Ok(TableArea::all()),
        (WILDCARD, row) => Ok(TableArea::row(parse_row(row).ok_or_else(invalid)?)),
        (col, WILDCARD) => Ok(TableArea::column(column_index(col).ok_or_else(invalid)?)),
        (col, row) => Ok(TableArea::cell(
            parse_row(row).ok_or_else(invalid)?,
            column_index(col).ok_or_else(invalid)?,
        )),
    }
}

fn axis_segment(
    bounds: Bounds,
    delimiter: RangeDelimiter,
    render: impl Fn(u32) -> String,
) -> String {
    match bounds {
        Bounds::Unbounded => WILDCARD.to_string(),
        Bounds::Span { start, end } if start == end => render(start),
        Bounds::Span { start, end } => format!("{}{}{}", render(start), delimiter, render(end)),
    }
}

impl TableArea {
    /// Canonical `[row, column]` segments for this area
    pub fn segments(&self, delimiter: RangeDelimiter) -> [String; 2] {
        [
            axis_segment(self.rows(), delimiter, |row| (row + 1).to_string()),
            axis_segment(self.cols(), delimiter, column_letters),
        ]
    }

    /// External reference for this area
    pub fn to_reference(&self, delimiter: RangeDelimiter) -> String {
        let [row, col] = self.segments(delimiter);
        combine_to_external(&row, &col, delimiter)
    }
}

/// Fold a row and a column segment back into one external reference
///
/// `("1", "A") -> "A1"`, `("*", "D") -> "D*"`, `("4:8", "D:G") -> "D4:G8"`.
pub fn combine_to_external(row: &str, col: &str, delimiter: RangeDelimiter) -> String {
    let row_range = split_range(row, delimiter);
    let col_range = split_range(col, delimiter);

    if row_range.is_none() && col_range.is_none() {
        if row == WILDCARD && col == WILDCARD {
            return WILDCARD.to_string();
        }
        return format!("{}{}", col, row);
    }

    let (row_start, row_end) = row_range.unwrap_or((row, row));
    let (col_start, col_end) = col_range.unwrap_or((col, col));
    format!(
        "{}{}{}{}{}",
        col_start, row_start, delimiter, col_end, row_end
    )
}
