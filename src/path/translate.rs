//! Path translation between external URIs and canonical tree paths

use crate::error::{CacheError, Result};

use super::kind::DocumentKind;
use super::reference::{combine_to_external, parse_reference};
use super::types::RangeDelimiter;

/// Split a URI path into decoded, non-empty segments
///
/// `/Sales/tables/Q1%202024/B2` becomes `["Sales", "tables", "Q1 2024", "B2"]`.
pub fn split_uri(uri: &str) -> Result<Vec<String>> {
    uri.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .map_err(|e| CacheError::InvalidReference(format!("{}: {}", segment, e)))
        })
        .collect()
}

/// Replace the external reference segment of a path with its canonical
/// `[row, column]` segments
///
/// Kinds without cell references, and Word paths outside `tables`, pass
/// through unchanged.
pub fn translate_input_path(
    mut segments: Vec<String>,
    kind: DocumentKind,
    delimiter: RangeDelimiter,
) -> Result<Vec<String>> {
    let Some(cell) = kind.policy().cell_reference else {
        return Ok(segments);
    };

    if let Some(selector) = cell.selector {
        if segments.get(1).map(String::as_str) != Some(selector) {
            return Ok(segments);
        }
    }

    let reference = segments.get(cell.offset).ok_or_else(|| {
        CacheError::InvalidReference(format!(
            "/{} has no reference segment at position {}",
            segments.join("/"),
            cell.offset
        ))
    })?;

    let area = parse_reference(reference, delimiter)?;
    segments.splice(cell.offset..=cell.offset, area.segments(delimiter));

    Ok(segments)
}

/// Fold canonical row and column segments of a tree path back into one
/// external reference and join the result with `/`
///
/// The row and column sit at fixed distances from the end of the path, so
/// the same rule applies to full paths and to paths relative to a start
/// node. Paths too short to hold both are joined unchanged.
pub fn translate_output_path<S: AsRef<str>>(
    segments: &[S],
    kind: DocumentKind,
    delimiter: RangeDelimiter,
) -> String {
    let parts: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();

    let Some(cell) = kind.policy().cell_reference else {
        return parts.join("/");
    };

    if parts.len() < 2 + cell.trailing {
        return parts.join("/");
    }

    let row = parts.len() - 2 - cell.trailing;
    let reference = combine_to_external(parts[row], parts[row + 1], delimiter);

    let mut folded: Vec<&str> = Vec::with_capacity(parts.len() - 1);
    folded.extend_from_slice(&parts[..row]);
    folded.push(&reference);
    folded.extend_from_slice(&parts[row + 2..]);
    folded.join("/")
}
