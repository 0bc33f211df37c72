//! Hierarchical addressing for document fragments
//!
//! External references are format specific (`A1`, `B2:D8`, `*4`, `29:37`).
//! The cache tree holds one piece of information per level, so references
//! are translated into canonical segments on the way in and folded back on
//! the way out.
//!
//! # Example
//!
//! ```text
//! /CsvTest/B2:E5                   external (csv)
//!     │
//!     ▼  translate_input_path
//! ["CsvTest", "2:5", "B:E"]        canonical: resource / row / column
//!     │
//!     ▼  bulk traversal
//! ["3", "C"]                       relative path of one hit
//!     │
//!     ▼  translate_output_path
//! "C3"                             sub-address returned to the caller
//! ```
//!
//! # Usage
//!
//! ```rust
//! use deeplink_cache::path::{parse_reference, RangeDelimiter};
//!
//! let area = parse_reference("G8:D4", RangeDelimiter::Colon).unwrap();
//! assert_eq!(area.to_reference(RangeDelimiter::Colon), "D4:G8");
//! ```

mod comparator;
mod kind;
mod reference;
mod translate;
mod types;

pub use comparator::{compare_segments, ordered_bounds, SegmentKey};
pub use kind::{CellReference, DocumentKind, KindPolicy};
pub use reference::{
    column_index, column_letters, combine_to_external, is_bulk_token, parse_reference,
    split_range, WILDCARD,
};
pub use translate::{split_uri, translate_input_path, translate_output_path};
pub use types::{Bounds, RangeDelimiter, TableArea};
